pub mod api;
pub mod board;
pub mod error;
pub mod form;
pub mod list;

pub use api::{HttpPublicationApi, PublicationApi, PublicationPage, QuarantinedRecord};
pub use board::{BoardAction, BoardEvent, LoadOutcome, PublicationBoard, Theme};
pub use error::ClientError;
pub use form::{validate, FormController, FormDraft, RequiredField};
pub use list::{apply_view, cycle_status, ListController, SortDirection, SortDirective};

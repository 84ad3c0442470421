use serde::{Deserialize, Serialize};

use crate::domain::{CreatedOn, PublicationStatus, TypeName};

/// Body of `POST /publications`. Co-authors travel as one comma-joined string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublicationRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TypeName,
    pub is_collective_authors: bool,
    pub authors: String,
    pub coauthors: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub status: PublicationStatus,
    pub no_state_secret: bool,
    pub expert_number: String,
    pub expert_date: String,
    pub expert_start: String,
    pub expert_end: String,
    pub created_at: CreatedOn,
}

/// Body of `PUT /publications/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: PublicationStatus,
}

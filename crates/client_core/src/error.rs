use shared::domain::{PublicationId, UnknownType};
use thiserror::Error;

use crate::{board::BoardAction, form::RequiredField};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("missing required fields: {}", RequiredField::join(.missing))]
    Validation { missing: Vec<RequiredField> },
    #[error(transparent)]
    UnknownType(#[from] UnknownType),
    #[error("{0} is already in flight")]
    Busy(BoardAction),
    #[error("publication {0} is not loaded")]
    NotLoaded(PublicationId),
    #[error("invalid store url: {0}")]
    Url(#[from] url::ParseError),
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store answered {status}: {message}")]
    Store { status: u16, message: String },
    #[error("failed to decode store response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Failures the user fixes by editing the draft, as opposed to store or network failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::UnknownType(_))
    }
}

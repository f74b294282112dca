use serde::Serialize;
use thiserror::Error;

use crate::{ApiError, ApiFailure, PersistError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CullError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("listing photos failed: {0}")]
    RemoteListingFailure(String),

    #[error("loading details for {id} failed: {message}")]
    RemoteDetailFailure { id: String, message: String },

    #[error("adding to the target album failed: {0}")]
    RemoteAddFailure(String),

    #[error("viewed ledger unavailable: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl CullError {
    pub(crate) fn listing(err: ApiError) -> Self {
        match err.kind {
            ApiFailure::Unauthorized => CullError::Unauthenticated,
            _ => CullError::RemoteListingFailure(err.to_string()),
        }
    }

    pub(crate) fn detail(id: &str, err: ApiError) -> Self {
        match err.kind {
            ApiFailure::Unauthorized => CullError::Unauthenticated,
            _ => CullError::RemoteDetailFailure {
                id: id.to_string(),
                message: err.to_string(),
            },
        }
    }

    pub(crate) fn remote_add(err: ApiError) -> Self {
        match err.kind {
            ApiFailure::Unauthorized => CullError::Unauthenticated,
            _ => CullError::RemoteAddFailure(err.to_string()),
        }
    }

    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            CullError::Unauthenticated => "unauthenticated",
            CullError::RemoteListingFailure(_) => "remote_listing_failure",
            CullError::RemoteDetailFailure { .. } => "remote_detail_failure",
            CullError::RemoteAddFailure(_) => "remote_add_failure",
            CullError::Storage(_) => "storage_error",
            CullError::Configuration(_) => "configuration_error",
        }
    }

    /// Message suitable for showing to the person reviewing photos.
    pub fn user_message(&self) -> String {
        match self {
            CullError::Unauthenticated => {
                "Your session has expired. Please log in again.".to_string()
            }
            CullError::RemoteListingFailure(_) | CullError::RemoteDetailFailure { .. } => {
                format!("Error fetching photos: {self}")
            }
            CullError::RemoteAddFailure(_) => format!("Error approving photo: {self}"),
            CullError::Storage(_) | CullError::Configuration(_) => self.to_string(),
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind(),
            message: self.user_message(),
        }
    }
}

impl From<PersistError> for CullError {
    fn from(err: PersistError) -> Self {
        CullError::Storage(err.to_string())
    }
}

/// JSON shape of a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub kind: &'static str,
    pub message: String,
}

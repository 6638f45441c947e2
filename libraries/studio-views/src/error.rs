//! Error types for the views

use studio_core::StudioError;
use studio_playback::PlaybackError;
use thiserror::Error;

/// Errors surfaced to the user by a view action
#[derive(Error, Debug)]
pub enum ViewError {
    /// A submission of the same form is still in flight
    #[error("Still saving, please wait")]
    Busy,

    /// Rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// Message from the gateway, verbatim
    #[error("{0}")]
    Gateway(String),

    /// Player refused the action
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// The referenced record is not in the loaded list
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

/// Result type for view actions
pub type Result<T> = std::result::Result<T, ViewError>;

impl ViewError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<StudioError> for ViewError {
    fn from(err: StudioError) -> Self {
        match err {
            StudioError::Validation(message) => ViewError::Validation(message),
            other => ViewError::Gateway(other.to_string()),
        }
    }
}

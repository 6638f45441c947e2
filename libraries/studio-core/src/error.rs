/// Core error types for Creator Studio
use thiserror::Error;

/// Result type alias using `StudioError`
pub type Result<T> = std::result::Result<T, StudioError>;

/// Core error type for Creator Studio
///
/// Client-side validation failures, errors reported by the hosted gateway
/// (kept verbatim), missing sessions and unknown records.
#[derive(Error, Debug)]
pub enum StudioError {
    /// A required field is missing or malformed (caught before any network call)
    #[error("{0}")]
    Validation(String),

    /// The gateway or identity provider rejected the call; message is verbatim
    #[error("{message}")]
    Gateway {
        /// HTTP status, when the error came from a response
        status: Option<u16>,
        /// Provider's human-readable message
        message: String,
    },

    /// The call needs a signed-in session
    #[error("Authentication required")]
    AuthRequired,

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("track", "genre", ...)
        entity: String,
        /// Identifier that was looked up
        id: String,
    },
}

impl StudioError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a gateway error without a status code
    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway {
            status: None,
            message: msg.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether the error was raised client-side before reaching the gateway
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

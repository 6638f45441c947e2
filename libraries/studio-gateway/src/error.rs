//! Error types for the gateway client.

use studio_core::StudioError;
use thiserror::Error;

/// Errors that can occur when talking to the hosted gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with an error; `message` is the provider's text
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// Authentication required or token rejected (401); carries the
    /// provider's message when the response had one
    #[error("{}", .0.as_deref().unwrap_or("Authentication required"))]
    AuthRequired(Option<String>),

    /// Credentials or one-time code rejected
    #[error("{0}")]
    AuthFailed(String),

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Invalid gateway URL
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),

    /// Invalid client configuration (missing key, bucket, ...)
    #[error("Invalid gateway configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse a response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Update or delete matched no row
    #[error("{table} row not found: {id}")]
    RowNotFound { table: String, id: String },

    /// Gateway is offline or unreachable
    #[error("Gateway unreachable: {0}")]
    ServerUnreachable(String),

    /// Rate limited by the gateway
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    /// Map transport failures, separating connection problems
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            GatewayError::ServerUnreachable(e.to_string())
        } else {
            GatewayError::Request(e)
        }
    }
}

impl From<GatewayError> for StudioError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Provider { status, message } => StudioError::Gateway {
                status: Some(status),
                message,
            },
            GatewayError::AuthRequired(Some(message)) => StudioError::Gateway {
                status: Some(401),
                message,
            },
            GatewayError::AuthRequired(None) => StudioError::AuthRequired,
            GatewayError::RowNotFound { table, id } => StudioError::NotFound { entity: table, id },
            GatewayError::AuthFailed(message) => StudioError::Gateway {
                status: None,
                message,
            },
            other => StudioError::Gateway {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_survives_conversion() {
        let err: StudioError = GatewayError::Provider {
            status: 409,
            message: "duplicate key value violates unique constraint \"genres_name_key\"".into(),
        }
        .into();

        match err {
            StudioError::Gateway { status, message } => {
                assert_eq!(status, Some(409));
                assert!(message.starts_with("duplicate key"));
            }
            e => panic!("Expected Gateway error, got: {:?}", e),
        }
    }

    #[test]
    fn auth_required_maps_to_core_variant() {
        let err: StudioError = GatewayError::AuthRequired(None).into();
        assert!(matches!(err, StudioError::AuthRequired));
    }

    #[test]
    fn rejected_token_keeps_provider_message() {
        let err: StudioError =
            GatewayError::AuthRequired(Some("JWT expired".to_string())).into();

        assert_eq!(err.to_string(), "JWT expired");
        assert!(matches!(
            err,
            StudioError::Gateway {
                status: Some(401),
                ..
            }
        ));
    }
}

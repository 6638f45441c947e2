//! Shared response handling.

use crate::error::{GatewayError, Result};
use crate::types::ApiError;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

/// Parse a successful JSON body.
pub(crate) async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| GatewayError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

/// Turn a non-success response into an error, keeping the provider's text.
pub(crate) async fn error_from(response: Response) -> GatewayError {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        return GatewayError::RateLimited {
            retry_after_secs: retry_after,
        };
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&text)
        .ok()
        .and_then(ApiError::into_message)
        .or_else(|| (!text.trim().is_empty()).then_some(text));

    if status == StatusCode::UNAUTHORIZED {
        return GatewayError::AuthRequired(message);
    }

    GatewayError::Provider {
        status: status.as_u16(),
        message: message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        }),
    }
}

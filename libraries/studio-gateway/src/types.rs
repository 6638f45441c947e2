//! Types for gateway requests and responses.

use serde::{Deserialize, Serialize};

/// Bucket the studio stores audio and cover art in
pub const DEFAULT_BUCKET: &str = "music-cms";

/// Configuration for connecting to the hosted gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the project (e.g., "https://abc.supabase.co")
    pub url: String,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
    /// Storage bucket for media objects
    pub bucket: String,
}

impl GatewayConfig {
    /// Create a config for the default bucket.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    /// Use a different storage bucket.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

// =============================================================================
// Auth Types
// =============================================================================

/// Body for password sign-in and sign-up.
#[derive(Debug, Serialize)]
pub(crate) struct CredentialsRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body for the refresh-token grant.
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Body for requesting a one-time code.
#[derive(Debug, Serialize)]
pub(crate) struct OtpRequest<'a> {
    pub email: &'a str,
    pub create_user: bool,
}

/// Body for verifying a one-time code.
#[derive(Debug, Serialize)]
pub(crate) struct VerifyRequest<'a> {
    pub email: &'a str,
    pub token: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

/// Body for a password reset email.
#[derive(Debug, Serialize)]
pub(crate) struct RecoverRequest<'a> {
    pub email: &'a str,
}

// =============================================================================
// Storage Types
// =============================================================================

/// Response from a successful object upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    /// Full key including the bucket name
    #[serde(rename = "Key")]
    pub key: String,
}

/// Body for removing objects.
#[derive(Debug, Serialize)]
pub(crate) struct RemoveRequest<'a> {
    pub prefixes: &'a [String],
}

// =============================================================================
// Error Types
// =============================================================================

/// Error body returned by the gateway services.
///
/// The auth service uses `msg` (or `error_description` on older
/// versions), the table API and storage use `message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiError {
    /// Most specific human-readable message in the body.
    pub fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_auth_message() {
        let body: ApiError = serde_json::from_str(
            r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid login credentials"));
    }

    #[test]
    fn picks_table_message() {
        let body: ApiError = serde_json::from_str(
            r#"{"code":"23505","details":null,"hint":null,"message":"duplicate key value"}"#,
        )
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("duplicate key value"));
    }

    #[test]
    fn legacy_error_description() {
        let body: ApiError = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#,
        )
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Email not confirmed"));
    }

    #[test]
    fn default_bucket() {
        let config = GatewayConfig::new("https://example.supabase.co", "anon");
        assert_eq!(config.bucket, DEFAULT_BUCKET);
        assert_eq!(config.with_bucket("other").bucket, "other");
    }
}

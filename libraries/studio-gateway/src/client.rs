//! Main gateway client.

use crate::auth::AuthClient;
use crate::error::{GatewayError, Result};
use crate::rest::TableClient;
use crate::storage::StorageClient;
use crate::types::GatewayConfig;
use reqwest::Client;
use std::time::Duration;
use studio_core::{AuthUser, OtpKind, Session, SignUpOutcome};
use tokio::sync::watch;
use tracing::{info, warn};

/// Table holding genre records
pub const GENRES_TABLE: &str = "genres";

/// Table holding track records
pub const TRACKS_TABLE: &str = "cms_tracks";

/// Client for the hosted auth, storage and table service.
///
/// Holds the current session (if any) and publishes every change to
/// subscribers, so views can react to sign-in and sign-out without
/// polling.
///
/// # Example
///
/// ```ignore
/// use studio_gateway::{GatewayClient, GatewayConfig};
///
/// let client = GatewayClient::new(GatewayConfig::new("https://abc.supabase.co", "anon-key"))?;
/// client.sign_in_with_password("producer@studio.com", "secret").await?;
/// let genres = client.table("genres").select::<Genre>(&Query::default()).await?;
/// ```
pub struct GatewayClient {
    http: Client,
    config: GatewayConfig,
    session: watch::Sender<Option<Session>>,
}

impl GatewayClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(GatewayError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(GatewayError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;

        if config.anon_key.trim().is_empty() {
            return Err(GatewayError::InvalidConfig("API key cannot be empty".into()));
        }
        if config.bucket.trim().is_empty() {
            return Err(GatewayError::InvalidConfig(
                "storage bucket cannot be empty".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("CreatorStudio/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GatewayError::Request)?;

        let (session, _) = watch::channel(None);

        Ok(Self {
            http,
            config: GatewayConfig { url, ..config },
            session,
        })
    }

    /// Get the gateway URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Get the storage bucket name.
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Current session, if signed in.
    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    /// Check if the client holds a session.
    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Subscribe to session changes (sign-in, refresh, sign-out).
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    /// Install a session obtained elsewhere.
    pub fn set_session(&self, session: Option<Session>) {
        self.session.send_replace(session);
    }

    /// Bearer for data requests: the user's token, or the anon key.
    fn bearer(&self) -> String {
        self.session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    // =========================================================================
    // Sub-clients
    // =========================================================================

    /// Identity provider client.
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.http, &self.config.url, &self.config.anon_key)
    }

    /// Handle for the configured storage bucket.
    pub fn storage(&self) -> StorageHandle {
        StorageHandle {
            http: self.http.clone(),
            url: self.config.url.clone(),
            api_key: self.config.anon_key.clone(),
            bearer: self.bearer(),
            bucket: self.config.bucket.clone(),
        }
    }

    /// Handle for a table.
    pub fn table(&self, table: &str) -> TableHandle {
        TableHandle {
            http: self.http.clone(),
            url: self.config.url.clone(),
            api_key: self.config.anon_key.clone(),
            bearer: self.bearer(),
            table: table.to_string(),
        }
    }

    // =========================================================================
    // Auth flows that update the session
    // =========================================================================

    /// Sign in with email and password and keep the session.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let session = self.auth().sign_in_with_password(email, password).await?;
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    /// Sign up; keeps the session when one is issued right away.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome> {
        let outcome = self.auth().sign_up(email, password).await?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.set_session(Some(session.clone()));
        }
        Ok(outcome)
    }

    /// Verify a one-time code and keep the session.
    pub async fn verify_otp(&self, email: &str, token: &str, kind: OtpKind) -> Result<Session> {
        let session = self.auth().verify_otp(email, token, kind).await?;
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    /// Refresh the access token using the refresh token.
    pub async fn refresh_session(&self) -> Result<Session> {
        let refresh_token = self
            .session
            .borrow()
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
            .ok_or(GatewayError::AuthRequired(None))?;

        let session = self.auth().refresh_session(&refresh_token).await?;
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    /// Sign out. The local session is dropped even if revocation fails.
    pub async fn sign_out(&self) -> Result<()> {
        let Some(session) = self.session() else {
            return Ok(());
        };

        self.set_session(None);
        info!(user_id = %session.user.id, "Signed out");

        self.auth().sign_out(&session.access_token).await
    }

    /// Fetch the user behind the current session.
    pub async fn current_user(&self) -> Result<AuthUser> {
        let token = self
            .session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
            .ok_or(GatewayError::AuthRequired(None))?;
        self.auth().get_user(&token).await
    }

    /// Execute an operation with automatic token refresh on 401.
    ///
    /// If the operation fails with `AuthRequired` and a refresh token is
    /// held, refreshes once and retries. A second rejection is returned with
    /// the provider's message.
    pub async fn with_auto_refresh<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        match operation().await {
            Err(GatewayError::AuthRequired(_)) if self.can_refresh() => {
                warn!("Token expired, attempting refresh");
                self.refresh_session().await?;
                operation().await
            }
            other => other,
        }
    }

    fn can_refresh(&self) -> bool {
        self.session
            .borrow()
            .as_ref()
            .is_some_and(|s| s.refresh_token.is_some())
    }
}

/// Owned handle for storage operations.
///
/// Captures the bearer at creation time so it can outlive a borrow of the
/// client across awaits.
pub struct StorageHandle {
    http: Client,
    url: String,
    api_key: String,
    bearer: String,
    bucket: String,
}

impl StorageHandle {
    /// Get the storage client.
    pub fn client(&self) -> StorageClient<'_> {
        StorageClient::new(&self.http, &self.url, &self.api_key, &self.bearer, &self.bucket)
    }
}

/// Owned handle for one table.
pub struct TableHandle {
    http: Client,
    url: String,
    api_key: String,
    bearer: String,
    table: String,
}

impl TableHandle {
    /// Get the table client.
    pub fn client(&self) -> TableClient<'_> {
        TableClient::new(&self.http, &self.url, &self.api_key, &self.bearer, &self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        let ok = |url: &str| GatewayClient::new(GatewayConfig::new(url, "anon")).is_ok();

        assert!(ok("https://abc.supabase.co"));
        assert!(ok("http://localhost:54321"));

        assert!(!ok(""));
        assert!(!ok("not-a-url"));
        assert!(!ok("ftp://example.com"));
    }

    #[test]
    fn test_url_normalization() {
        let client =
            GatewayClient::new(GatewayConfig::new("https://abc.supabase.co/", "anon")).unwrap();
        assert_eq!(client.url(), "https://abc.supabase.co");
    }

    #[test]
    fn empty_key_rejected() {
        let result = GatewayClient::new(GatewayConfig::new("https://abc.supabase.co", " "));
        assert!(matches!(result, Err(GatewayError::InvalidConfig(_))));
    }

    #[test]
    fn starts_signed_out() {
        let client =
            GatewayClient::new(GatewayConfig::new("https://abc.supabase.co", "anon")).unwrap();
        assert!(!client.is_authenticated());
        assert_eq!(client.bearer(), "anon");
    }
}

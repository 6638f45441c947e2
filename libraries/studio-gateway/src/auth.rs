//! Identity provider endpoints (`/auth/v1`).

use crate::error::{GatewayError, Result};
use crate::response::{error_from, parse_json};
use crate::types::{CredentialsRequest, OtpRequest, RecoverRequest, RefreshRequest, VerifyRequest};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use studio_core::{AuthUser, OtpKind, Session, SignUpOutcome};
use tracing::{debug, info, warn};

/// Authentication client for the hosted identity provider.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    api_key: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, api_key: &'a str) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn post(&self, endpoint: &str) -> RequestBuilder {
        let url = format!("{}/auth/v1/{}", self.base_url, endpoint);
        debug!(url = %url, "Auth request");
        self.http.post(url).header("apikey", self.api_key)
    }

    async fn send_json<B: Serialize>(&self, builder: RequestBuilder, body: &B) -> Result<Response> {
        builder
            .json(body)
            .send()
            .await
            .map_err(GatewayError::from_send)
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .send_json(
                self.post("token").query(&[("grant_type", "password")]),
                &CredentialsRequest { email, password },
            )
            .await?;

        let session: Session = credentials_result(response, "sign-in response").await?;
        info!(user_id = %session.user.id, "Signed in with password");
        Ok(session)
    }

    /// Create an account.
    ///
    /// Projects that confirm email addresses answer with the bare user and
    /// email a code; otherwise a session comes back immediately.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome> {
        let response = self
            .send_json(self.post("signup"), &CredentialsRequest { email, password })
            .await?;

        let body: serde_json::Value = credentials_result(response, "sign-up response").await?;

        if body.get("access_token").is_some() {
            let session: Session = serde_json::from_value(body)
                .map_err(|e| GatewayError::ParseError(format!("Failed to parse session: {}", e)))?;
            info!(user_id = %session.user.id, "Signed up and signed in");
            return Ok(SignUpOutcome::SignedIn(session));
        }

        let user_value = body.get("user").cloned().unwrap_or(body);
        let user: AuthUser = serde_json::from_value(user_value)
            .map_err(|e| GatewayError::ParseError(format!("Failed to parse user: {}", e)))?;
        info!(user_id = %user.id, "Signed up, confirmation pending");
        Ok(SignUpOutcome::ConfirmationSent(user))
    }

    /// Email a one-time code (creating the user if needed).
    pub async fn send_otp(&self, email: &str) -> Result<()> {
        let response = self
            .send_json(
                self.post("otp"),
                &OtpRequest {
                    email,
                    create_user: true,
                },
            )
            .await?;

        if response.status().is_success() {
            debug!("One-time code sent");
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }

    /// Exchange a one-time code for a session.
    pub async fn verify_otp(&self, email: &str, token: &str, kind: OtpKind) -> Result<Session> {
        let response = self
            .send_json(
                self.post("verify"),
                &VerifyRequest {
                    email,
                    token,
                    kind: kind.as_str(),
                },
            )
            .await?;

        let session: Session = credentials_result(response, "verify response").await?;
        info!(user_id = %session.user.id, kind = kind.as_str(), "One-time code verified");
        Ok(session)
    }

    /// Email a password reset link.
    pub async fn send_password_reset(&self, email: &str) -> Result<()> {
        let response = self
            .send_json(self.post("recover"), &RecoverRequest { email })
            .await?;

        if response.status().is_success() {
            debug!("Password reset email requested");
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }

    /// Refresh an expired access token using the refresh token.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session> {
        let response = self
            .send_json(
                self.post("token").query(&[("grant_type", "refresh_token")]),
                &RefreshRequest { refresh_token },
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            let session: Session = parse_json(response, "refresh response").await?;
            debug!("Token refresh successful");
            Ok(session)
        } else {
            let err = error_from(response).await;
            warn!(status = %status, error = %err, "Token refresh failed");
            Err(GatewayError::TokenRefreshFailed(err.to_string()))
        }
    }

    /// Revoke the session server-side.
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .post("logout")
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(GatewayError::from_send)?;

        let status = response.status();
        if status.is_success() || status.as_u16() == 401 {
            // An already-expired token is as signed out as it gets
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }

    /// Get the user behind an access token.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        let url = format!("{}/auth/v1/user", self.base_url);
        debug!(url = %url, "Getting current user");

        let response = self
            .http
            .get(&url)
            .header("apikey", self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(GatewayError::from_send)?;

        let status = response.status();
        if status.is_success() {
            parse_json(response, "user").await
        } else if status.as_u16() == 403 {
            Err(GatewayError::AuthRequired(None))
        } else {
            Err(error_from(response).await)
        }
    }
}

/// Parse a credentials exchange, reporting rejections as `AuthFailed`.
async fn credentials_result<T: serde::de::DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        return parse_json(response, what).await;
    }

    match error_from(response).await {
        GatewayError::Provider {
            status: code,
            message,
        } if (400..500).contains(&code) => {
            warn!(status = %status, error = %message, "Credentials rejected");
            Err(GatewayError::AuthFailed(message))
        }
        other => Err(other),
    }
}

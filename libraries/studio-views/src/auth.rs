//! Sign-in form state machine
//!
//! Five modes: password sign-in, sign-up, one-time-code request, code
//! entry and password reset. Each action is one identity-provider call;
//! the mode changes only on that call's outcome.

use crate::error::{Result, ViewError};
use std::sync::Arc;
use studio_core::{IdentityProvider, OtpKind, Session, SignUpOutcome};
use tracing::{debug, info};

/// Number of boxes in the code entry
pub const CODE_LENGTH: usize = 6;

/// Shown after a successful reset request
pub const RESET_SENT_NOTICE: &str = "Password reset email sent! Check your inbox.";

/// Shown when the sign-up passwords differ (or a field is empty)
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Which form is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
    /// Request a one-time code by email
    Otp,
    /// Enter the six-digit code
    Verify,
    Forgot,
}

/// Message line under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Error(String),
    Info(String),
}

/// What an action led to
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStep {
    /// Nothing was sent (missing input or incomplete code)
    Ignored,
    /// A code was emailed; the form now waits for it
    AwaitingCode,
    /// Reset email requested
    ResetRequested,
    SignedIn(Session),
}

/// Form state for the signed-out screen
pub struct AuthFlow {
    identity: Arc<dyn IdentityProvider>,
    mode: AuthMode,
    email: String,
    password: String,
    confirm_password: String,
    code: [String; CODE_LENGTH],
    focus: usize,
    /// Verification type for the code being entered
    code_kind: OtpKind,
    banner: Option<Banner>,
}

impl AuthFlow {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            mode: AuthMode::SignIn,
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            code: Default::default(),
            focus: 0,
            code_kind: OtpKind::Magiclink,
            banner: None,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Index of the code box that has focus
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Code as typed so far
    pub fn code(&self) -> String {
        self.code.concat()
    }

    pub fn code_kind(&self) -> OtpKind {
        self.code_kind
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn set_confirm_password(&mut self, password: impl Into<String>) {
        self.confirm_password = password.into();
    }

    /// Show another form. The banner is cleared.
    pub fn switch_mode(&mut self, mode: AuthMode) {
        debug!(from = ?self.mode, to = ?mode, "Auth mode switch");
        self.mode = mode;
        self.banner = None;
        if mode == AuthMode::Verify {
            self.reset_code();
        }
    }

    /// Password sign-in. Empty email or password sends nothing.
    pub async fn sign_in(&mut self) -> Result<AuthStep> {
        if self.email.is_empty() || self.password.is_empty() {
            return Ok(AuthStep::Ignored);
        }

        self.banner = None;
        let result = self
            .identity
            .sign_in_with_password(&self.email, &self.password)
            .await;
        let session = self.report(result)?;
        info!(user_id = %session.user.id, "Signed in");
        Ok(AuthStep::SignedIn(session))
    }

    /// Create an account; password and confirmation must match.
    pub async fn sign_up(&mut self) -> Result<AuthStep> {
        if self.email.is_empty()
            || self.password.is_empty()
            || self.password != self.confirm_password
        {
            self.banner = Some(Banner::Error(PASSWORD_MISMATCH.to_string()));
            return Err(ViewError::Validation(PASSWORD_MISMATCH.to_string()));
        }

        self.banner = None;
        let result = self.identity.sign_up(&self.email, &self.password).await;
        let outcome = self.report(result)?;

        match outcome {
            SignUpOutcome::SignedIn(session) => Ok(AuthStep::SignedIn(session)),
            SignUpOutcome::ConfirmationSent(_) => {
                self.await_code(OtpKind::Signup);
                Ok(AuthStep::AwaitingCode)
            }
        }
    }

    /// Email a one-time sign-in code.
    ///
    /// The email is sent as typed, even when empty; the provider's rejection
    /// becomes the banner.
    pub async fn send_code(&mut self) -> Result<AuthStep> {
        self.banner = None;
        let result = self.identity.send_otp(&self.email).await;
        self.report(result)?;
        self.await_code(OtpKind::Magiclink);
        Ok(AuthStep::AwaitingCode)
    }

    /// Type into code box `index`.
    ///
    /// More than one character is ignored. A character moves focus to the
    /// next box; filling the last box submits the code.
    pub async fn enter_digit(&mut self, index: usize, value: &str) -> Result<AuthStep> {
        if index >= CODE_LENGTH || value.chars().count() > 1 {
            return Ok(AuthStep::Ignored);
        }

        self.code[index] = value.to_string();
        if !value.is_empty() && index < CODE_LENGTH - 1 {
            self.focus = index + 1;
        }

        if index == CODE_LENGTH - 1 && !value.is_empty() {
            return self.verify().await;
        }
        Ok(AuthStep::Ignored)
    }

    /// Backspace in box `index`: clears it, or moves back when already empty
    pub fn backspace(&mut self, index: usize) {
        if index >= CODE_LENGTH {
            return;
        }
        if self.code[index].is_empty() {
            if index > 0 {
                self.focus = index - 1;
            }
        } else {
            self.code[index].clear();
            self.focus = index;
        }
    }

    /// Submit the code; incomplete codes send nothing
    pub async fn verify(&mut self) -> Result<AuthStep> {
        let token = self.code();
        if token.chars().count() != CODE_LENGTH {
            return Ok(AuthStep::Ignored);
        }

        self.banner = None;
        let result = self
            .identity
            .verify_otp(&self.email, &token, self.code_kind)
            .await;
        let session = self.report(result)?;
        info!(user_id = %session.user.id, kind = self.code_kind.as_str(), "Code verified");
        Ok(AuthStep::SignedIn(session))
    }

    /// Request a password reset email. Like `send_code`, an empty email is
    /// left for the provider to reject.
    pub async fn forgot(&mut self) -> Result<AuthStep> {
        self.banner = None;
        let result = self.identity.send_password_reset(&self.email).await;
        self.report(result)?;
        self.banner = Some(Banner::Info(RESET_SENT_NOTICE.to_string()));
        Ok(AuthStep::ResetRequested)
    }

    /// Back to an empty sign-in form (after signing out)
    pub fn reset(&mut self) {
        self.mode = AuthMode::SignIn;
        self.password.clear();
        self.confirm_password.clear();
        self.banner = None;
        self.reset_code();
    }

    fn await_code(&mut self, kind: OtpKind) {
        self.code_kind = kind;
        self.mode = AuthMode::Verify;
        self.reset_code();
    }

    fn reset_code(&mut self) {
        self.code = Default::default();
        self.focus = 0;
    }

    /// Put a provider error on the banner and pass it on
    fn report<T>(&mut self, result: studio_core::Result<T>) -> Result<T> {
        result.map_err(|e| {
            let err = ViewError::from(e);
            self.banner = Some(Banner::Error(err.to_string()));
            err
        })
    }
}

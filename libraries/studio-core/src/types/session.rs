//! Identity provider session types

use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Opaque credential bundle issued by the identity provider
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token validity in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish_non_exhaustive()
    }
}

/// Result of a sign-up call
///
/// Providers with email confirmation enabled return only the user; the
/// session arrives after the emailed code is verified.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// Signed in immediately
    SignedIn(Session),
    /// Account created, confirmation code sent
    ConfirmationSent(AuthUser),
}

/// Which flow issued a one-time code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpKind {
    /// Code emailed after sign-up
    Signup,
    /// Passwordless sign-in code
    Magiclink,
}

impl OtpKind {
    /// Wire name of the verification type
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpKind::Signup => "signup",
            OtpKind::Magiclink => "magiclink",
        }
    }
}

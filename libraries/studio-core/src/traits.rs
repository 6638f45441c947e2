/// Backend traits the studio is written against
///
/// The hosted gateway implements all three; tests substitute in-memory
/// fakes. Every method is a single round trip and errors carry the
/// provider's message unchanged.
use crate::error::Result;
use crate::types::{
    Genre, GenreId, NewGenre, NewTrack, OtpKind, Session, SignUpOutcome, Track, TrackId,
};
use async_trait::async_trait;

/// Identity provider operations
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Create an account
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome>;

    /// Email a one-time sign-in code
    async fn send_otp(&self, email: &str) -> Result<()>;

    /// Exchange a one-time code for a session
    async fn verify_otp(&self, email: &str, token: &str, kind: OtpKind) -> Result<Session>;

    /// Email a password reset link
    async fn send_password_reset(&self, email: &str) -> Result<()>;

    /// End the current session
    async fn sign_out(&self) -> Result<()>;

    /// Current session, if any
    async fn current_session(&self) -> Option<Session>;
}

/// Object storage operations
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload bytes under `path`, returning the stored object reference
    async fn upload(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<String>;

    /// Remove objects by path
    async fn remove(&self, paths: &[String]) -> Result<()>;

    /// Publicly retrievable URL for an object reference
    fn public_url(&self, path: &str) -> String;
}

/// Table operations on the `genres` and `cms_tracks` collections
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Active genres ordered by name
    async fn list_genres(&self) -> Result<Vec<Genre>>;

    /// Insert a genre and return the stored row
    async fn insert_genre(&self, genre: &NewGenre) -> Result<Genre>;

    /// Update a genre by id
    async fn update_genre(&self, id: &GenreId, genre: &NewGenre) -> Result<Genre>;

    /// Delete a genre by id (tracks keep their reference)
    async fn delete_genre(&self, id: &GenreId) -> Result<()>;

    /// Active tracks, newest first, with the genre name joined
    async fn list_tracks(&self) -> Result<Vec<Track>>;

    /// Insert a track row and return it
    async fn insert_track(&self, track: &NewTrack) -> Result<Track>;

    /// Delete a track row by id (stored files are left in place)
    async fn delete_track(&self, id: &TrackId) -> Result<()>;
}

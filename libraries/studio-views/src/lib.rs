//! Creator Studio - Views
//!
//! Headless view models for the studio screens:
//! - [`GenreEditor`]: genre list with add/edit/delete
//! - [`TrackLibrary`]: track list, upload form, playback entry point
//! - [`AuthFlow`]: the five-mode sign-in form
//! - [`PlayerWidget`]: the player bar
//! - [`Studio`]: wires them together and follows the session
//!
//! Views talk to the backend only through the `studio-core` traits, fetch
//! whole collections after every mutation and report gateway messages
//! verbatim.

pub mod auth;
pub mod error;
pub mod genres;
mod guard;
pub mod player;
pub mod studio;
pub mod tracks;

pub use auth::{AuthFlow, AuthMode, AuthStep, Banner};
pub use error::{Result, ViewError};
pub use genres::{GenreEditor, GenreEditorState};
pub use player::{format_time, PlayerView, PlayerWidget};
pub use studio::Studio;
pub use tracks::{LibraryStats, TrackLibrary, TrackLibraryState};

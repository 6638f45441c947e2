//! Creator Studio Core
//!
//! Platform-agnostic domain types, traits, and error handling shared by the
//! gateway client, the catalog views and the command-line shell.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Genre`, `Session` and the drafts used to create them
//! - **Backend Traits**: `IdentityProvider`, `ObjectStore`, `CatalogStore`
//! - **Error Handling**: Unified `StudioError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use studio_core::types::{MediaFile, TrackDraft};
//!
//! let mut draft = TrackDraft::default();
//! draft.title = "Neon Drive".to_string();
//! assert!(draft.validate().is_err()); // audio file is mandatory
//!
//! draft.audio = Some(MediaFile::new("neon.mp3", vec![0u8; 4]));
//! assert!(draft.validate().is_ok());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Result, StudioError};
pub use traits::{CatalogStore, IdentityProvider, ObjectStore};

pub use types::{
    // Catalog
    Genre, GenreDraft, GenreId, DEFAULT_GENRE_COLOR, GenreRef, NewGenre, NewTrack, Track, TrackDraft, TrackId, ValidTrackDraft,
    // Media
    MediaFile, ObjectKind, DEFAULT_THUMBNAIL_PATH,
    // Auth
    AuthUser, OtpKind, Session, SignUpOutcome,
};

//! Domain types for the studio catalog and sessions

mod genre;
mod ids;
mod media;
mod session;
mod track;

pub use genre::{Genre, GenreDraft, NewGenre, DEFAULT_GENRE_COLOR};
pub use ids::{GenreId, TrackId};
pub use media::{content_type_for, MediaFile, ObjectKind, DEFAULT_THUMBNAIL_PATH};
pub use session::{AuthUser, OtpKind, Session, SignUpOutcome};
pub use track::{
    GenreRef, NewTrack, Track, TrackDraft, ValidTrackDraft, DEFAULT_DURATION_SECS, UNKNOWN_ARTIST,
    UNSORTED_LABEL,
};

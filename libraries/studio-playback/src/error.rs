//! Error types for playback coordination

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Track has no stream location to point the device at
    #[error("Track is not playable: {0}")]
    NotPlayable(String),

    /// Volume was NaN or infinite
    #[error("Invalid volume: {0}")]
    InvalidVolume(f32),

    /// Seek fraction was NaN or infinite
    #[error("Invalid seek position: {0}")]
    InvalidSeekPosition(f32),

    /// The output device refused the operation
    #[error("Audio output error: {0}")]
    Output(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

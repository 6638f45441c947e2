//! Core types for playback state

use crate::volume::DEFAULT_VOLUME;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A track as the player needs it: display data plus a resolved stream URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    /// Catalog record ID
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Retrievable stream location
    pub url: String,
    /// Cover image URL
    pub thumbnail_url: Option<String>,
    /// Length from the catalog record, used when the stream reports none
    pub duration: Option<Duration>,
}

/// Coarse player state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// No track loaded
    Idle,
    /// Track loaded and playing
    Playing,
    /// Track loaded, paused
    Paused,
}

/// Everything consumers may read about playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub current_track: Option<NowPlaying>,
    pub is_playing: bool,
    /// Stored level (0.0-1.0); unchanged by mute
    pub volume: f32,
    pub muted: bool,
    /// Declared but never filled by any flow
    pub queue: Vec<NowPlaying>,
}

impl PlaybackSnapshot {
    /// Initial state with a given volume level
    pub fn with_volume(volume: f32) -> Self {
        Self {
            current_track: None,
            is_playing: false,
            volume,
            muted: false,
            queue: Vec::new(),
        }
    }

    /// Coarse state derived from the fields
    pub fn status(&self) -> PlayerStatus {
        match (&self.current_track, self.is_playing) {
            (None, _) => PlayerStatus::Idle,
            (Some(_), true) => PlayerStatus::Playing,
            (Some(_), false) => PlayerStatus::Paused,
        }
    }
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self::with_volume(DEFAULT_VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_idle() {
        let snapshot = PlaybackSnapshot::default();
        assert_eq!(snapshot.status(), PlayerStatus::Idle);
        assert!((snapshot.volume - 0.8).abs() < f32::EPSILON);
        assert!(!snapshot.muted);
        assert!(snapshot.queue.is_empty());
    }
}

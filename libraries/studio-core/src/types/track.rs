//! Track types

use super::{GenreId, MediaFile, TrackId};
use crate::error::{Result, StudioError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label shown for tracks without a (resolvable) genre
pub const UNSORTED_LABEL: &str = "Unsorted";

/// Artist written when the form leaves it blank
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Duration recorded for published tracks, in seconds
///
/// Files are not inspected before upload, so every row gets this placeholder.
pub const DEFAULT_DURATION_SECS: u32 = 180;

/// Embedded genre name from a `genres(name)` join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreRef {
    pub name: String,
}

/// A track as stored in the `cms_tracks` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    /// Storage path of the audio object; legacy rows may lack one
    #[serde(default)]
    pub audio_path: Option<String>,
    /// Storage path of the cover art
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub genre_id: Option<GenreId>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub duration: Option<u32>,
    /// Joined genre; `None` when unset or when the genre row is gone
    #[serde(default)]
    pub genres: Option<GenreRef>,
}

fn default_active() -> bool {
    true
}

impl Track {
    /// Genre name for display, falling back to "Unsorted"
    pub fn genre_label(&self) -> &str {
        self.genres
            .as_ref()
            .map(|g| g.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNSORTED_LABEL)
    }

    /// Artist for display
    pub fn artist_label(&self) -> &str {
        self.artist
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(UNKNOWN_ARTIST)
    }

    /// Whether the row references an audio object at all
    pub fn is_playable(&self) -> bool {
        self.audio_path
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }

    /// Duration in seconds, using the publish placeholder when absent
    pub fn duration_secs(&self) -> u32 {
        self.duration.unwrap_or(DEFAULT_DURATION_SECS)
    }
}

/// Row inserted into the `cms_tracks` table
///
/// `audio_path` is not optional: every track created by the studio
/// references an uploaded audio object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub thumbnail: Option<String>,
    pub audio_path: String,
    pub genre_id: Option<GenreId>,
    pub duration: u32,
}

/// Track upload form state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackDraft {
    pub title: String,
    pub artist: String,
    pub thumbnail: Option<MediaFile>,
    pub audio: Option<MediaFile>,
    pub genre_id: Option<GenreId>,
}

/// Checked view of a draft, ready to be uploaded
#[derive(Debug, Clone, Copy)]
pub struct ValidTrackDraft<'a> {
    pub title: &'a str,
    pub artist: &'a str,
    pub audio: &'a MediaFile,
    pub thumbnail: Option<&'a MediaFile>,
    pub genre_id: Option<&'a GenreId>,
}

impl TrackDraft {
    /// Whether the publish control should be enabled
    pub fn is_submittable(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate the draft
    ///
    /// Title (after trimming) and audio file are both required.
    pub fn validate(&self) -> Result<ValidTrackDraft<'_>> {
        let title = self.title.trim();
        let audio = match (title.is_empty(), self.audio.as_ref()) {
            (false, Some(audio)) => audio,
            _ => {
                return Err(StudioError::validation(
                    "Title and audio file are required!",
                ))
            }
        };

        if audio.is_empty() {
            return Err(StudioError::validation(format!(
                "Audio file '{}' is empty",
                audio.file_name
            )));
        }

        Ok(ValidTrackDraft {
            title,
            artist: self.artist.trim(),
            audio,
            thumbnail: self.thumbnail.as_ref(),
            genre_id: self.genre_id.as_ref(),
        })
    }
}

impl ValidTrackDraft<'_> {
    /// Build the metadata row once the objects are stored
    pub fn into_row(self, audio_path: String, thumbnail_path: Option<String>) -> NewTrack {
        let artist = if self.artist.is_empty() {
            UNKNOWN_ARTIST.to_string()
        } else {
            self.artist.to_string()
        };

        NewTrack {
            title: self.title.to_string(),
            artist,
            thumbnail: thumbnail_path,
            audio_path,
            genre_id: self.genre_id.cloned(),
            duration: DEFAULT_DURATION_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(genres: Option<&str>) -> Track {
        Track {
            id: TrackId::new("1"),
            title: "Neon Drive".into(),
            artist: Some("Kavinsky".into()),
            audio_path: Some("audio/1_abcde.mp3".into()),
            thumbnail: None,
            genre_id: Some(GenreId::new("9")),
            is_active: true,
            created_at: Utc::now(),
            duration: None,
            genres: genres.map(|name| GenreRef { name: name.into() }),
        }
    }

    #[test]
    fn genre_label_falls_back_to_unsorted() {
        assert_eq!(row(Some("Synthwave")).genre_label(), "Synthwave");
        // Dangling genre_id: the join comes back null
        assert_eq!(row(None).genre_label(), UNSORTED_LABEL);
    }

    #[test]
    fn empty_title_and_missing_audio_are_rejected() {
        let draft = TrackDraft::default();
        assert!(draft.validate().unwrap_err().is_validation());
        assert!(!draft.is_submittable());

        let titled = TrackDraft {
            title: "Neon Drive".into(),
            ..TrackDraft::default()
        };
        assert!(titled.validate().is_err());

        let whitespace_title = TrackDraft {
            title: "   ".into(),
            audio: Some(MediaFile::new("a.mp3", vec![1])),
            ..TrackDraft::default()
        };
        assert!(whitespace_title.validate().is_err());
    }

    #[test]
    fn blank_artist_becomes_unknown() {
        let draft = TrackDraft {
            title: " Neon Drive ".into(),
            artist: "  ".into(),
            audio: Some(MediaFile::new("a.mp3", vec![1, 2, 3])),
            ..TrackDraft::default()
        };
        let row = draft
            .validate()
            .unwrap()
            .into_row("audio/x.mp3".into(), None);
        assert_eq!(row.title, "Neon Drive");
        assert_eq!(row.artist, UNKNOWN_ARTIST);
        assert_eq!(row.duration, DEFAULT_DURATION_SECS);
        assert!(row.thumbnail.is_none());
    }

    #[test]
    fn null_audio_path_is_not_playable() {
        let mut track = row(None);
        track.audio_path = None;
        assert!(!track.is_playable());
    }

    #[test]
    fn deserializes_joined_row() {
        let track: Track = serde_json::from_value(serde_json::json!({
            "id": 12,
            "title": "Neon Drive",
            "artist": "Kavinsky",
            "audio_path": "audio/1_abcde.mp3",
            "thumbnail": null,
            "genre_id": 4,
            "is_active": true,
            "created_at": "2024-05-01T10:00:00.123456+00:00",
            "duration": 180,
            "genres": { "name": "Synthwave" }
        }))
        .unwrap();

        assert_eq!(track.id.as_str(), "12");
        assert_eq!(track.genre_label(), "Synthwave");
        assert_eq!(track.duration_secs(), 180);
    }
}

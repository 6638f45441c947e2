//! Genre types

use super::GenreId;
use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};

/// Color preselected in the genre editor
pub const DEFAULT_GENRE_COLOR: &str = "#8b5cf6";

/// A music genre as stored in the `genres` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Row inserted into or patched onto the `genres` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGenre {
    pub name: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Editable genre form state
#[derive(Debug, Clone, PartialEq)]
pub struct GenreDraft {
    pub name: String,
    pub color: Option<String>,
}

impl Default for GenreDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: Some(DEFAULT_GENRE_COLOR.to_string()),
        }
    }
}

impl GenreDraft {
    /// Draft with only a name, as entered in the quick-add box
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    /// Prefill the form from an existing genre
    pub fn from_genre(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
            color: genre.color.clone(),
        }
    }

    /// Validate the draft and produce the row to send
    ///
    /// The name is trimmed and must not be empty; a color, when present,
    /// must be a `#rrggbb` hex triplet.
    pub fn validate(&self) -> Result<NewGenre> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(StudioError::validation("Genre name is required"));
        }

        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                return Err(StudioError::validation(format!(
                    "Invalid color '{}', expected #rrggbb",
                    color
                )));
            }
        }

        Ok(NewGenre {
            name: name.to_string(),
            is_active: true,
            color: self.color.as_ref().map(|c| c.to_ascii_lowercase()),
        })
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let draft = GenreDraft::named("   ");
        assert!(draft.validate().unwrap_err().is_validation());
    }

    #[test]
    fn name_is_trimmed_and_row_is_active() {
        let row = GenreDraft::named("  Synthwave ").validate().unwrap();
        assert_eq!(row.name, "Synthwave");
        assert!(row.is_active);
        assert!(row.color.is_none());
    }

    #[test]
    fn default_draft_carries_editor_color() {
        let draft = GenreDraft {
            name: "Rock".into(),
            ..GenreDraft::default()
        };
        let row = draft.validate().unwrap();
        assert_eq!(row.color.as_deref(), Some(DEFAULT_GENRE_COLOR));
    }

    #[test]
    fn malformed_color_is_rejected() {
        let draft = GenreDraft {
            name: "Rock".into(),
            color: Some("purple".into()),
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn missing_active_flag_defaults_to_true() {
        let genre: Genre = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Ambient"
        }))
        .unwrap();
        assert!(genre.is_active);
        assert_eq!(genre.id.as_str(), "3");
    }
}

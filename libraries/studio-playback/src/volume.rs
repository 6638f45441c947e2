//! Volume control
//!
//! Linear level in `[0.0, 1.0]` with a mute flag that preserves the level.

use crate::error::{PlaybackError, Result};

/// Level used at startup and after the player is closed
pub const DEFAULT_VOLUME: f32 = 0.8;

/// Volume controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller, clamping `level` into range.
    ///
    /// Non-finite levels fall back to [`DEFAULT_VOLUME`].
    pub fn new(level: f32) -> Self {
        let level = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            DEFAULT_VOLUME
        };
        Self {
            level,
            muted: false,
        }
    }

    /// Set volume level, clamped to 0.0-1.0
    pub fn set_level(&mut self, level: f32) -> Result<()> {
        if !level.is_finite() {
            return Err(PlaybackError::InvalidVolume(level));
        }
        self.level = level.clamp(0.0, 1.0);
        Ok(())
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Level as a whole percentage, for display
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain the device should apply: 0.0 if muted, otherwise the level
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(DEFAULT_VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::default();
        assert!((vol.level() - 0.8).abs() < f32::EPSILON);
        assert!(!vol.is_muted());
        assert_eq!(vol.percent(), 80);
    }

    #[test]
    fn level_is_clamped() {
        let mut vol = Volume::new(1.5);
        assert!((vol.level() - 1.0).abs() < f32::EPSILON);

        vol.set_level(-0.2).unwrap();
        assert!(vol.level().abs() < f32::EPSILON);
    }

    #[test]
    fn non_finite_level_rejected() {
        let mut vol = Volume::new(0.5);
        assert!(matches!(
            vol.set_level(f32::NAN),
            Err(PlaybackError::InvalidVolume(_))
        ));
        assert!(vol.set_level(f32::INFINITY).is_err());
        assert!((vol.level() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(0.3);
        vol.toggle_mute();

        assert!(vol.is_muted());
        assert!(vol.gain().abs() < f32::EPSILON);
        assert!((vol.level() - 0.3).abs() < f32::EPSILON);

        vol.toggle_mute();
        assert!((vol.gain() - 0.3).abs() < f32::EPSILON);
    }
}

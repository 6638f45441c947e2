//! Creator Studio - Playback Coordination
//!
//! One audio output device, one piece of state describing it.
//!
//! This crate provides:
//! - A coordinator with play/toggle/close/seek actions
//! - Volume control (linear 0.0-1.0, mute preserving the level)
//! - An output device trait plus a headless implementation
//! - Snapshots and a watch channel for consumers
//!
//! # Example
//!
//! ```rust
//! use studio_playback::{NowPlaying, PlaybackCoordinator, PlayerStatus};
//!
//! let mut player = PlaybackCoordinator::default();
//!
//! player
//!     .play_track(NowPlaying {
//!         id: "7".to_string(),
//!         title: "Neon Drive".to_string(),
//!         artist: "Night Runner".to_string(),
//!         url: "https://abc.supabase.co/storage/v1/object/public/music-cms/audio/1_abcde.mp3"
//!             .to_string(),
//!         thumbnail_url: None,
//!         duration: None,
//!     })
//!     .unwrap();
//! assert_eq!(player.status(), PlayerStatus::Playing);
//!
//! player.set_volume(0.3).unwrap();
//! player.toggle_mute();
//! assert_eq!(player.output().gain(), 0.0);
//!
//! player.clear_queue();
//! assert_eq!(player.status(), PlayerStatus::Idle);
//! ```

pub mod coordinator;
pub mod error;
pub mod output;
pub mod types;
pub mod volume;

pub use coordinator::{PlaybackCoordinator, SharedCoordinator};
pub use error::{PlaybackError, Result};
pub use output::{AudioOutput, HeadlessOutput};
pub use types::{NowPlaying, PlaybackSnapshot, PlayerStatus};
pub use volume::{Volume, DEFAULT_VOLUME};

//! Playback coordinator
//!
//! Owns the single output device and the state describing it. Views call
//! the action methods; everything else reads snapshots.

use crate::error::{PlaybackError, Result};
use crate::output::{AudioOutput, HeadlessOutput};
use crate::types::{NowPlaying, PlaybackSnapshot, PlayerStatus};
use crate::volume::{Volume, DEFAULT_VOLUME};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Coordinator shared between the catalog views and the player widget
pub type SharedCoordinator = Arc<Mutex<PlaybackCoordinator>>;

/// Single source of truth for "what is playing"
pub struct PlaybackCoordinator {
    output: Box<dyn AudioOutput>,
    current_track: Option<NowPlaying>,
    is_playing: bool,
    volume: Volume,
    initial_volume: f32,
    queue: Vec<NowPlaying>,
    updates: watch::Sender<PlaybackSnapshot>,
}

impl PlaybackCoordinator {
    /// Create a coordinator driving `output`
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self::with_volume(output, DEFAULT_VOLUME)
    }

    /// Create a coordinator whose initial (and reset) volume is `initial_volume`
    pub fn with_volume(mut output: Box<dyn AudioOutput>, initial_volume: f32) -> Self {
        let volume = Volume::new(initial_volume);
        output.set_gain(volume.gain());
        let (updates, _) = watch::channel(PlaybackSnapshot::with_volume(volume.level()));

        Self {
            output,
            current_track: None,
            is_playing: false,
            volume,
            initial_volume: volume.level(),
            queue: Vec::new(),
            updates,
        }
    }

    /// Coordinator on a [`HeadlessOutput`], wrapped for sharing
    pub fn headless(initial_volume: f32) -> SharedCoordinator {
        Self::with_volume(Box::new(HeadlessOutput::new()), initial_volume).into_shared()
    }

    /// Wrap for sharing
    pub fn into_shared(self) -> SharedCoordinator {
        Arc::new(Mutex::new(self))
    }

    // ===== Transport =====

    /// Load `track` into the device and start it, interrupting anything
    /// already playing.
    ///
    /// If the device refuses the new media, the previous track is reloaded
    /// at its old position so the device and the coordinator agree again.
    pub fn play_track(&mut self, track: NowPlaying) -> Result<()> {
        if track.url.trim().is_empty() {
            return Err(PlaybackError::NotPlayable(track.title));
        }

        let resume_at = self.output.position();
        let started = self
            .output
            .load(&track.url, track.duration)
            .and_then(|()| self.output.play());
        if let Err(e) = started {
            warn!(error = %e, url = %track.url, "Device refused track");
            self.restore_previous(resume_at);
            return Err(e);
        }

        info!(track_id = %track.id, title = %track.title, "Now playing");
        self.current_track = Some(track);
        self.is_playing = true;
        self.publish();
        Ok(())
    }

    /// Put the device back on the current track after a failed load.
    /// Falls back to idle when that fails too.
    fn restore_previous(&mut self, position: Duration) {
        let Some(previous) = self.current_track.as_ref() else {
            self.output.stop();
            return;
        };

        let was_playing = self.is_playing;
        let restored = self
            .output
            .load(&previous.url, previous.duration)
            .and_then(|()| self.output.seek(position))
            .and_then(|()| {
                if was_playing {
                    self.output.play()
                } else {
                    Ok(())
                }
            });

        if let Err(e) = restored {
            warn!(error = %e, "Could not restore previous track, closing player");
            self.output.stop();
            self.current_track = None;
            self.is_playing = false;
            self.publish();
        }
    }

    /// Invert play/pause of the loaded track
    pub fn toggle_play(&mut self) -> Result<()> {
        if self.current_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        if self.is_playing {
            self.output.pause();
        } else {
            self.output.play()?;
        }

        self.is_playing = !self.is_playing;
        debug!(playing = self.is_playing, "Toggled playback");
        self.publish();
        Ok(())
    }

    /// Stop, release the media and reset every field to its initial value
    pub fn clear_queue(&mut self) {
        self.output.stop();

        self.current_track = None;
        self.is_playing = false;
        self.volume = Volume::new(self.initial_volume);
        self.queue.clear();
        self.output.set_gain(self.volume.gain());

        info!("Player closed");
        self.publish();
    }

    /// Seek to `fraction` of the track length; no-op while the length is unknown
    pub fn seek_fraction(&mut self, fraction: f32) -> Result<()> {
        if !fraction.is_finite() {
            return Err(PlaybackError::InvalidSeekPosition(fraction));
        }
        if self.current_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        let Some(duration) = self.duration() else {
            return Ok(());
        };

        let target = duration.mul_f64(f64::from(fraction.clamp(0.0, 1.0)));
        self.output.seek(target)?;
        debug!(position = ?target, "Seeked");
        Ok(())
    }

    // ===== Volume =====

    /// Set the stored level (clamped to 0.0-1.0) and push it to the device
    pub fn set_volume(&mut self, level: f32) -> Result<()> {
        self.volume.set_level(level)?;
        self.output.set_gain(self.volume.gain());
        self.publish();
        Ok(())
    }

    /// Flip mute; the stored level is kept
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.output.set_gain(self.volume.gain());
        debug!(muted = self.volume.is_muted(), "Toggled mute");
        self.publish();
    }

    // ===== Queries =====

    /// Playhead position
    pub fn position(&self) -> Duration {
        if self.current_track.is_none() {
            return Duration::ZERO;
        }
        self.output.position()
    }

    /// Track length: what the device reports, else the catalog value
    pub fn duration(&self) -> Option<Duration> {
        self.current_track.as_ref()?;
        self.output
            .duration()
            .or_else(|| self.current_track.as_ref().and_then(|t| t.duration))
    }

    /// Current track, if any
    pub fn current_track(&self) -> Option<&NowPlaying> {
        self.current_track.as_ref()
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Coarse state
    pub fn status(&self) -> PlayerStatus {
        self.snapshot().status()
    }

    /// Volume controller state
    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// The device being driven
    pub fn output(&self) -> &dyn AudioOutput {
        self.output.as_ref()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_track: self.current_track.clone(),
            is_playing: self.is_playing,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            queue: self.queue.clone(),
        }
    }

    /// Receive a snapshot after every action
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.updates.subscribe()
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

impl Default for PlaybackCoordinator {
    fn default() -> Self {
        Self::new(Box::new(HeadlessOutput::new()))
    }
}

//! Audio output device abstraction
//!
//! The coordinator drives exactly one device through this trait. Real
//! decoders/sinks live outside this crate; [`HeadlessOutput`] keeps a
//! wall-clock position and logs what a device would do.

use crate::error::{PlaybackError, Result};
use std::time::{Duration, Instant};
use tracing::debug;

/// The single audio output device.
pub trait AudioOutput: Send {
    /// Point the device at a stream location, replacing any loaded media.
    ///
    /// `duration` is a hint used when the stream does not report one.
    fn load(&mut self, url: &str, duration: Option<Duration>) -> Result<()>;

    /// Start or resume the loaded media
    fn play(&mut self) -> Result<()>;

    /// Pause without releasing the media
    fn pause(&mut self);

    /// Stop and release the media reference
    fn stop(&mut self);

    /// Move the playhead
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Apply output gain (0.0 = silent)
    fn set_gain(&mut self, gain: f32);

    /// Gain currently applied
    fn gain(&self) -> f32;

    /// Current playhead position
    fn position(&self) -> Duration;

    /// Length of the loaded media, if known
    fn duration(&self) -> Option<Duration>;

    /// Location of the loaded media, if any
    fn source(&self) -> Option<&str>;
}

/// Output device without a sound card.
///
/// Position advances with wall-clock time while playing and stops at the
/// media duration.
#[derive(Debug, Default)]
pub struct HeadlessOutput {
    source: Option<String>,
    duration: Option<Duration>,
    gain: f32,
    /// Position accumulated before the current play run
    offset: Duration,
    /// Start of the current play run
    started: Option<Instant>,
}

impl HeadlessOutput {
    /// Create an idle device
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the playhead is advancing
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    fn clamp(&self, position: Duration) -> Duration {
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }
}

impl AudioOutput for HeadlessOutput {
    fn load(&mut self, url: &str, duration: Option<Duration>) -> Result<()> {
        debug!(url, ?duration, "Loading media");
        self.source = Some(url.to_string());
        self.duration = duration;
        self.offset = Duration::ZERO;
        self.started = None;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(PlaybackError::Output("no media loaded".into()));
        }
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
        debug!(position = ?self.position(), "Output playing");
        Ok(())
    }

    fn pause(&mut self) {
        self.offset = self.position();
        self.started = None;
        debug!(position = ?self.offset, "Output paused");
    }

    fn stop(&mut self) {
        self.source = None;
        self.duration = None;
        self.offset = Duration::ZERO;
        self.started = None;
        debug!("Output stopped");
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        if self.source.is_none() {
            return Err(PlaybackError::Output("no media loaded".into()));
        }
        self.offset = self.clamp(position);
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn gain(&self) -> f32 {
        self.gain
    }

    fn position(&self) -> Duration {
        let running = self.started.map_or(Duration::ZERO, |s| s.elapsed());
        self.clamp(self.offset + running)
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

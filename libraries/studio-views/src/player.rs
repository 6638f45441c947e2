//! Player widget: what the bar shows and the controls it offers

use crate::error::Result;
use std::time::Duration;
use studio_playback::{PlaybackSnapshot, SharedCoordinator};

/// Format seconds as `m:ss`
pub fn format_time(time: Duration) -> String {
    let secs = time.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Everything the player bar renders
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub title: String,
    pub artist: String,
    pub is_playing: bool,
    pub muted: bool,
    pub volume: f32,
    pub position: Duration,
    pub duration: Option<Duration>,
}

impl PlayerView {
    /// Seek bar value in `[0, 1]`; 0 while the length is unknown
    pub fn progress(&self) -> f32 {
        match self.duration {
            Some(d) if !d.is_zero() => {
                (self.position.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0) as f32
            }
            _ => 0.0,
        }
    }

    /// `elapsed / total` readout
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.position),
            format_time(self.duration.unwrap_or_default())
        )
    }
}

/// Controls bound to the shared coordinator
#[derive(Clone)]
pub struct PlayerWidget {
    player: SharedCoordinator,
}

impl PlayerWidget {
    pub fn new(player: SharedCoordinator) -> Self {
        Self { player }
    }

    /// Bar contents; `None` hides the bar (nothing loaded)
    pub async fn view(&self) -> Option<PlayerView> {
        let player = self.player.lock().await;
        let snapshot = player.snapshot();
        let track = snapshot.current_track?;

        Some(PlayerView {
            title: track.title,
            artist: track.artist,
            is_playing: snapshot.is_playing,
            muted: snapshot.muted,
            volume: snapshot.volume,
            position: player.position(),
            duration: player.duration(),
        })
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.player.lock().await.snapshot()
    }

    pub async fn toggle_play(&self) -> Result<()> {
        Ok(self.player.lock().await.toggle_play()?)
    }

    pub async fn toggle_mute(&self) {
        self.player.lock().await.toggle_mute();
    }

    pub async fn set_volume(&self, level: f32) -> Result<()> {
        Ok(self.player.lock().await.set_volume(level)?)
    }

    /// Drag the seek bar to `fraction`
    pub async fn seek(&self, fraction: f32) -> Result<()> {
        Ok(self.player.lock().await.seek_fraction(fraction)?)
    }

    /// Close the bar: stop and reset the player
    pub async fn close(&self) {
        self.player.lock().await.clear_queue();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_playback::{NowPlaying, PlaybackCoordinator};

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(Duration::ZERO), "0:00");
        assert_eq!(format_time(Duration::from_secs(65)), "1:05");
        assert_eq!(format_time(Duration::from_millis(180_900)), "3:00");
        assert_eq!(format_time(Duration::from_secs(3600)), "60:00");
    }

    #[test]
    fn progress_without_duration_is_zero() {
        let view = PlayerView {
            title: "Neon Drive".into(),
            artist: "Night Runner".into(),
            is_playing: true,
            muted: false,
            volume: 0.8,
            position: Duration::from_secs(30),
            duration: None,
        };
        assert!(view.progress().abs() < f32::EPSILON);
        assert_eq!(view.time_label(), "0:30 / 0:00");
    }

    #[tokio::test]
    async fn hidden_until_something_plays() {
        let widget = PlayerWidget::new(PlaybackCoordinator::headless(0.8));
        assert!(widget.view().await.is_none());

        widget
            .player
            .lock()
            .await
            .play_track(NowPlaying {
                id: "7".into(),
                title: "Neon Drive".into(),
                artist: "Night Runner".into(),
                url: "https://cdn.example/audio/7.mp3".into(),
                thumbnail_url: None,
                duration: Some(Duration::from_secs(180)),
            })
            .unwrap();
        widget.toggle_play().await.unwrap();
        widget.seek(0.5).await.unwrap();

        let view = widget.view().await.unwrap();
        assert_eq!(view.title, "Neon Drive");
        assert!(!view.is_playing);
        assert!((view.progress() - 0.5).abs() < 0.01);
        assert_eq!(view.time_label(), "1:30 / 3:00");

        widget.close().await;
        assert!(widget.view().await.is_none());
    }
}

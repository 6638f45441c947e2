//! Track library: listing, publishing, deleting and playing tracks

use crate::error::{Result, ViewError};
use crate::guard::{BusyFlag, FetchGeneration};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use studio_core::{
    CatalogStore, Genre, ObjectKind, ObjectStore, Track, TrackDraft, TrackId, ValidTrackDraft,
    DEFAULT_THUMBNAIL_PATH,
};
use studio_playback::{NowPlaying, PlaybackError, SharedCoordinator};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// What the library screen shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackLibraryState {
    /// Active tracks, newest first
    pub tracks: Vec<Track>,
    /// Active genres for the genre picker
    pub genres: Vec<Genre>,
    /// Upload form
    pub draft: TrackDraft,
}

/// Header counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryStats {
    pub tracks: usize,
    pub genres: usize,
}

/// Track list plus the upload form
pub struct TrackLibrary {
    catalog: Arc<dyn CatalogStore>,
    storage: Arc<dyn ObjectStore>,
    player: SharedCoordinator,
    state: RwLock<TrackLibraryState>,
    fetches: FetchGeneration,
    publishing: BusyFlag,
}

impl TrackLibrary {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        storage: Arc<dyn ObjectStore>,
        player: SharedCoordinator,
    ) -> Self {
        Self {
            catalog,
            storage,
            player,
            state: RwLock::new(TrackLibraryState::default()),
            fetches: FetchGeneration::default(),
            publishing: BusyFlag::default(),
        }
    }

    /// Fetch genres and tracks.
    ///
    /// A result is applied only if no newer load started in the meantime.
    pub async fn load(&self) -> Result<()> {
        let ticket = self.fetches.begin();
        let genres = self.catalog.list_genres().await?;
        let tracks = self.catalog.list_tracks().await?;

        let mut state = self.state.write().await;
        if !self.fetches.is_current(ticket) {
            debug!(ticket, "Dropping stale track list");
            return Ok(());
        }
        debug!(tracks = tracks.len(), genres = genres.len(), "Library loaded");
        state.genres = genres;
        state.tracks = tracks;
        Ok(())
    }

    /// Replace the upload form
    pub async fn set_draft(&self, draft: TrackDraft) {
        self.state.write().await.draft = draft;
    }

    /// Current upload form
    pub async fn draft(&self) -> TrackDraft {
        self.state.read().await.draft.clone()
    }

    /// Upload the cover (if any) and audio, then insert the metadata row.
    ///
    /// If any step fails, objects already uploaded by this call are removed
    /// and the original error is returned.
    pub async fn publish(&self) -> Result<Track> {
        let draft = self.draft().await;
        let valid = draft.validate()?;
        let _publishing = self.publishing.acquire()?;

        let millis = Utc::now().timestamp_millis();
        let (audio_path, thumbnail_path) = {
            let mut rng = rand::thread_rng();
            (
                ObjectKind::Audio.object_path(valid.audio, millis, &mut rng),
                valid
                    .thumbnail
                    .map(|file| ObjectKind::Thumbnail.object_path(file, millis, &mut rng)),
            )
        };

        let mut uploaded = Vec::new();
        let track = match self
            .store(valid, audio_path, thumbnail_path, &mut uploaded)
            .await
        {
            Ok(track) => track,
            Err(err) => {
                warn!(error = %err, "Publish failed");
                self.remove_uploaded(&uploaded).await;
                return Err(err.into());
            }
        };

        info!(track_id = %track.id, title = %track.title, "Track published");
        self.set_draft(TrackDraft::default()).await;
        self.load().await?;
        Ok(track)
    }

    async fn store(
        &self,
        valid: ValidTrackDraft<'_>,
        audio_path: String,
        thumbnail_path: Option<String>,
        uploaded: &mut Vec<String>,
    ) -> studio_core::Result<Track> {
        if let (Some(file), Some(path)) = (valid.thumbnail, thumbnail_path.as_deref()) {
            self.storage
                .upload(path, &file.content_type, file.bytes.clone())
                .await?;
            uploaded.push(path.to_string());
        }

        self.storage
            .upload(&audio_path, &valid.audio.content_type, valid.audio.bytes.clone())
            .await?;
        uploaded.push(audio_path.clone());

        let row = valid.into_row(audio_path, thumbnail_path);
        self.catalog.insert_track(&row).await
    }

    async fn remove_uploaded(&self, uploaded: &[String]) {
        if uploaded.is_empty() {
            return;
        }
        match self.storage.remove(uploaded).await {
            Ok(()) => info!(count = uploaded.len(), "Removed objects of failed publish"),
            Err(e) => warn!(
                error = %e,
                paths = ?uploaded,
                "Failed to remove objects of failed publish"
            ),
        }
    }

    /// Delete the track row. Stored objects stay where they are.
    pub async fn delete(&self, id: &TrackId) -> Result<()> {
        self.catalog.delete_track(id).await?;
        info!(track_id = %id, "Track deleted");
        self.load().await
    }

    /// Resolve the track's audio URL and hand it to the player
    pub async fn play(&self, id: &TrackId) -> Result<NowPlaying> {
        let track = self
            .state
            .read()
            .await
            .tracks
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| ViewError::not_found("track", id))?;

        let Some(audio_path) = track.audio_path.as_deref().filter(|_| track.is_playable()) else {
            return Err(PlaybackError::NotPlayable(track.title.clone()).into());
        };

        let now_playing = NowPlaying {
            id: track.id.to_string(),
            title: track.title.clone(),
            artist: track.artist_label().to_string(),
            url: self.storage.public_url(audio_path),
            thumbnail_url: Some(self.thumbnail_url(&track)),
            duration: Some(Duration::from_secs(u64::from(track.duration_secs()))),
        };

        self.player.lock().await.play_track(now_playing.clone())?;
        Ok(now_playing)
    }

    /// Public URL of the track's cover, or of the placeholder
    pub fn thumbnail_url(&self, track: &Track) -> String {
        let path = track
            .thumbnail
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_THUMBNAIL_PATH);
        self.storage.public_url(path)
    }

    /// Loaded tracks whose title or artist contains `query`, ignoring case
    pub async fn search(&self, query: &str) -> Vec<Track> {
        let needle = query.trim().to_lowercase();
        let state = self.state.read().await;

        state
            .tracks
            .iter()
            .filter(|t| {
                needle.is_empty()
                    || t.title.to_lowercase().contains(&needle)
                    || t
                        .artist
                        .as_deref()
                        .is_some_and(|a| a.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Track and genre counts
    pub async fn stats(&self) -> LibraryStats {
        let state = self.state.read().await;
        LibraryStats {
            tracks: state.tracks.len(),
            genres: state.genres.len(),
        }
    }

    /// Current screen state
    pub async fn state(&self) -> TrackLibraryState {
        self.state.read().await.clone()
    }

    /// Whether a publish is in flight
    pub fn is_publishing(&self) -> bool {
        self.publishing.is_set()
    }

    /// Forget everything (signed out); in-flight fetches are discarded
    pub async fn clear(&self) {
        self.fetches.begin();
        *self.state.write().await = TrackLibraryState::default();
    }
}

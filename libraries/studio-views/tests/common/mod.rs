//! In-memory backend shared by the view tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use studio_core::{
    AuthUser, CatalogStore, Genre, GenreId, GenreRef, IdentityProvider, NewGenre, NewTrack,
    ObjectStore, OtpKind, Result, Session, SignUpOutcome, StudioError, Track, TrackId,
};
use studio_playback::{PlaybackCoordinator, SharedCoordinator};
use studio_views::Studio;
use tokio::sync::watch;

pub const PASSWORD: &str = "secret";
pub const CODE: &str = "123456";

#[derive(Default)]
struct Data {
    genres: Vec<Genre>,
    tracks: Vec<Track>,
    objects: BTreeMap<String, Vec<u8>>,
    next_id: i64,
    calls: Vec<String>,
    list_delays: VecDeque<Duration>,
    fail_upload: Option<String>,
    fail_insert_track: Option<String>,
    fail_insert_genre: Option<String>,
    confirm_sign_up: bool,
}

/// Fake gateway: catalog, storage and identity in one place
pub struct FakeBackend {
    data: Mutex<Data>,
    session: watch::Sender<Option<Session>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        let (session, _) = watch::channel(None);
        Self {
            data: Mutex::new(Data {
                next_id: 1,
                confirm_sign_up: true,
                ..Data::default()
            }),
            session,
        }
    }
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, call: impl Into<String>) {
        self.data.lock().unwrap().calls.push(call.into());
    }

    /// Every backend call so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.data.lock().unwrap().calls.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn objects(&self) -> Vec<String> {
        self.data.lock().unwrap().objects.keys().cloned().collect()
    }

    pub fn tracks(&self) -> Vec<Track> {
        self.data.lock().unwrap().tracks.clone()
    }

    /// Seed a genre directly
    pub fn add_genre(&self, name: &str) -> GenreId {
        let mut data = self.data.lock().unwrap();
        let id = GenreId::from(data.next_id);
        data.next_id += 1;
        data.genres.push(Genre {
            id: id.clone(),
            name: name.to_string(),
            is_active: true,
            color: None,
        });
        id
    }

    /// Seed a track row directly
    pub fn add_track(&self, title: &str, audio_path: Option<&str>) -> TrackId {
        let row = NewTrack {
            title: title.to_string(),
            artist: "Night Runner".to_string(),
            thumbnail: None,
            audio_path: String::new(),
            genre_id: None,
            duration: 200,
        };
        let mut track = self.store_track(&row);
        track.audio_path = audio_path.map(str::to_string);
        let id = track.id.clone();
        let mut data = self.data.lock().unwrap();
        if let Some(slot) = data.tracks.iter_mut().find(|t| t.id == id) {
            *slot = track;
        }
        id
    }

    /// Delay the next list calls (genres or tracks, in call order); each
    /// call snapshots its rows before sleeping
    pub fn delay_lists(&self, delays: &[Duration]) {
        self.data.lock().unwrap().list_delays.extend(delays);
    }

    pub fn fail_upload(&self, message: &str) {
        self.data.lock().unwrap().fail_upload = Some(message.to_string());
    }

    pub fn fail_insert_track(&self, message: &str) {
        self.data.lock().unwrap().fail_insert_track = Some(message.to_string());
    }

    pub fn fail_insert_genre(&self, message: &str) {
        self.data.lock().unwrap().fail_insert_genre = Some(message.to_string());
    }

    pub fn sign_up_signs_in(&self) {
        self.data.lock().unwrap().confirm_sign_up = false;
    }

    pub fn sessions(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    fn next_delay(&self) -> Option<Duration> {
        self.data.lock().unwrap().list_delays.pop_front()
    }

    fn store_track(&self, row: &NewTrack) -> Track {
        let mut data = self.data.lock().unwrap();
        let n = data.next_id;
        data.next_id += 1;
        let track = Track {
            id: TrackId::from(n),
            title: row.title.clone(),
            artist: Some(row.artist.clone()),
            audio_path: Some(row.audio_path.clone()),
            thumbnail: row.thumbnail.clone(),
            genre_id: row.genre_id.clone(),
            is_active: true,
            created_at: Utc.timestamp_opt(1_700_000_000 + n, 0).unwrap(),
            duration: Some(row.duration),
            genres: None,
        };
        data.tracks.push(track.clone());
        track
    }

    fn session_for(email: &str) -> Session {
        Session {
            access_token: format!("token-{}", email),
            refresh_token: Some("refresh".to_string()),
            expires_in: Some(3600),
            token_type: "bearer".to_string(),
            user: AuthUser {
                id: "user-1".to_string(),
                email: Some(email.to_string()),
            },
        }
    }
}

#[async_trait]
impl CatalogStore for FakeBackend {
    async fn list_genres(&self) -> Result<Vec<Genre>> {
        self.record("list_genres");
        let mut genres: Vec<Genre> = self
            .data
            .lock()
            .unwrap()
            .genres
            .iter()
            .filter(|g| g.is_active)
            .cloned()
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));

        if let Some(delay) = self.next_delay() {
            tokio::time::sleep(delay).await;
        }
        Ok(genres)
    }

    async fn insert_genre(&self, genre: &NewGenre) -> Result<Genre> {
        self.record(format!("insert_genre:{}", genre.name));
        let mut data = self.data.lock().unwrap();
        if let Some(message) = data.fail_insert_genre.clone() {
            return Err(StudioError::Gateway {
                status: Some(409),
                message,
            });
        }
        let id = GenreId::from(data.next_id);
        data.next_id += 1;
        let row = Genre {
            id,
            name: genre.name.clone(),
            is_active: genre.is_active,
            color: genre.color.clone(),
        };
        data.genres.push(row.clone());
        Ok(row)
    }

    async fn update_genre(&self, id: &GenreId, genre: &NewGenre) -> Result<Genre> {
        self.record(format!("update_genre:{}", id));
        let mut data = self.data.lock().unwrap();
        let row = data
            .genres
            .iter_mut()
            .find(|g| &g.id == id)
            .ok_or_else(|| StudioError::not_found("genres", id.as_str()))?;
        row.name = genre.name.clone();
        row.color = genre.color.clone();
        Ok(row.clone())
    }

    async fn delete_genre(&self, id: &GenreId) -> Result<()> {
        self.record(format!("delete_genre:{}", id));
        self.data.lock().unwrap().genres.retain(|g| &g.id != id);
        Ok(())
    }

    async fn list_tracks(&self) -> Result<Vec<Track>> {
        self.record("list_tracks");
        let mut tracks: Vec<Track> = {
            let data = self.data.lock().unwrap();
            data.tracks
                .iter()
                .filter(|t| t.is_active)
                .map(|t| {
                    let mut t = t.clone();
                    t.genres = t.genre_id.as_ref().and_then(|gid| {
                        data.genres
                            .iter()
                            .find(|g| &g.id == gid)
                            .map(|g| GenreRef {
                                name: g.name.clone(),
                            })
                    });
                    t
                })
                .collect()
        };
        tracks.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(delay) = self.next_delay() {
            tokio::time::sleep(delay).await;
        }
        Ok(tracks)
    }

    async fn insert_track(&self, track: &NewTrack) -> Result<Track> {
        self.record(format!("insert_track:{}", track.title));
        let failure = self.data.lock().unwrap().fail_insert_track.clone();
        if let Some(message) = failure {
            return Err(StudioError::Gateway {
                status: Some(400),
                message,
            });
        }
        Ok(self.store_track(track))
    }

    async fn delete_track(&self, id: &TrackId) -> Result<()> {
        self.record(format!("delete_track:{}", id));
        self.data.lock().unwrap().tracks.retain(|t| &t.id != id);
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FakeBackend {
    async fn upload(&self, path: &str, _content_type: &str, bytes: Vec<u8>) -> Result<String> {
        self.record(format!("upload:{}", path));
        let mut data = self.data.lock().unwrap();
        if let Some(message) = data.fail_upload.clone() {
            if path.starts_with("audio/") {
                return Err(StudioError::gateway(message));
            }
        }
        data.objects.insert(path.to_string(), bytes);
        Ok(path.to_string())
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        self.record(format!("remove:{}", paths.join(",")));
        let mut data = self.data.lock().unwrap();
        for path in paths {
            data.objects.remove(path);
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://cdn.example/music-cms/{}", path)
    }
}

#[async_trait]
impl IdentityProvider for FakeBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        self.record(format!("sign_in:{}", email));
        if password != PASSWORD {
            return Err(StudioError::Gateway {
                status: None,
                message: "Invalid login credentials".to_string(),
            });
        }
        let session = Self::session_for(email);
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<SignUpOutcome> {
        self.record(format!("sign_up:{}", email));
        let session = Self::session_for(email);
        if self.data.lock().unwrap().confirm_sign_up {
            Ok(SignUpOutcome::ConfirmationSent(session.user))
        } else {
            self.session.send_replace(Some(session.clone()));
            Ok(SignUpOutcome::SignedIn(session))
        }
    }

    async fn send_otp(&self, email: &str) -> Result<()> {
        self.record(format!("send_otp:{}", email));
        if email.is_empty() {
            return Err(StudioError::Gateway {
                status: Some(422),
                message: "Signups not allowed for otp".to_string(),
            });
        }
        Ok(())
    }

    async fn verify_otp(&self, email: &str, token: &str, kind: OtpKind) -> Result<Session> {
        self.record(format!("verify_otp:{}:{}:{}", email, token, kind.as_str()));
        if token != CODE {
            return Err(StudioError::Gateway {
                status: Some(403),
                message: "Token has expired or is invalid".to_string(),
            });
        }
        let session = Self::session_for(email);
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn send_password_reset(&self, email: &str) -> Result<()> {
        self.record(format!("recover:{}", email));
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        self.record("sign_out");
        self.session.send_replace(None);
        Ok(())
    }

    async fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }
}

pub fn player() -> SharedCoordinator {
    PlaybackCoordinator::headless(0.8)
}

/// Studio wired to one fake backend
pub fn studio(backend: &Arc<FakeBackend>) -> (Arc<Studio>, SharedCoordinator) {
    let player = player();
    let studio = Studio::new(
        backend.clone(),
        backend.clone(),
        backend.clone(),
        player.clone(),
    );
    (Arc::new(studio), player)
}

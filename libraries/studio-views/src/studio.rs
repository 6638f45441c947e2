//! Root of the signed-in experience
//!
//! Owns the views and reacts to session changes: a new session loads the
//! catalog, losing it clears every list.

use crate::auth::AuthFlow;
use crate::error::Result;
use crate::genres::GenreEditor;
use crate::player::PlayerWidget;
use crate::tracks::TrackLibrary;
use std::sync::Arc;
use studio_core::{CatalogStore, IdentityProvider, ObjectStore, Session};
use studio_playback::SharedCoordinator;
use tokio::sync::{watch, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// All views of the studio, wired to one set of backends
pub struct Studio {
    identity: Arc<dyn IdentityProvider>,
    pub genres: GenreEditor,
    pub tracks: TrackLibrary,
    pub player: PlayerWidget,
    auth: Mutex<AuthFlow>,
}

impl Studio {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        catalog: Arc<dyn CatalogStore>,
        storage: Arc<dyn ObjectStore>,
        player: SharedCoordinator,
    ) -> Self {
        Self {
            genres: GenreEditor::new(catalog.clone()),
            tracks: TrackLibrary::new(catalog, storage, player.clone()),
            player: PlayerWidget::new(player),
            auth: Mutex::new(AuthFlow::new(identity.clone())),
            identity,
        }
    }

    /// The signed-out form
    pub async fn auth(&self) -> MutexGuard<'_, AuthFlow> {
        self.auth.lock().await
    }

    pub async fn is_signed_in(&self) -> bool {
        self.identity.current_session().await.is_some()
    }

    /// Load or clear the catalog for a session change
    pub async fn on_session_changed(&self, session: Option<&Session>) -> Result<()> {
        match session {
            Some(session) => {
                info!(user_id = %session.user.id, "Session started, loading catalog");
                self.genres.load().await?;
                self.tracks.load().await
            }
            None => {
                info!("Session ended, clearing catalog");
                self.genres.clear().await;
                self.tracks.clear().await;
                self.auth.lock().await.reset();
                Ok(())
            }
        }
    }

    /// Apply the session that exists at startup
    pub async fn start(&self) -> Result<()> {
        let session = self.identity.current_session().await;
        if session.is_some() {
            self.on_session_changed(session.as_ref()).await?;
        }
        Ok(())
    }

    /// Sign out and drop the loaded lists right away
    pub async fn sign_out(&self) -> Result<()> {
        let result = self.identity.sign_out().await;
        self.on_session_changed(None).await?;
        Ok(result?)
    }

    /// Follow session changes in the background until the sender goes away
    pub fn watch_sessions(
        self: Arc<Self>,
        mut sessions: watch::Receiver<Option<Session>>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while sessions.changed().await.is_ok() {
                let session = sessions.borrow_and_update().clone();
                debug!(signed_in = session.is_some(), "Session change");
                if let Err(e) = self.on_session_changed(session.as_ref()).await {
                    warn!(error = %e, "Failed to refresh catalog after session change");
                }
            }
        })
    }
}

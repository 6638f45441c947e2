//! Genre list and editor

use crate::error::{Result, ViewError};
use crate::guard::{BusyFlag, FetchGeneration};
use std::sync::Arc;
use studio_core::{CatalogStore, Genre, GenreDraft, GenreId};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// What the genre screen shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreEditorState {
    /// Active genres, by name
    pub genres: Vec<Genre>,
    /// Add/edit form
    pub form: GenreDraft,
    /// Genre being edited; `None` means the form creates
    pub editing: Option<GenreId>,
}

/// Genre list with an add/edit form.
///
/// Every mutation is a single round trip followed by a full refetch.
pub struct GenreEditor {
    catalog: Arc<dyn CatalogStore>,
    state: RwLock<GenreEditorState>,
    fetches: FetchGeneration,
    saving: BusyFlag,
}

impl GenreEditor {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            catalog,
            state: RwLock::new(GenreEditorState::default()),
            fetches: FetchGeneration::default(),
            saving: BusyFlag::default(),
        }
    }

    /// Fetch the genre list, dropping the result if a newer fetch started
    pub async fn load(&self) -> Result<()> {
        let ticket = self.fetches.begin();
        let genres = self.catalog.list_genres().await?;

        let mut state = self.state.write().await;
        if !self.fetches.is_current(ticket) {
            debug!(ticket, "Dropping stale genre list");
            return Ok(());
        }
        debug!(count = genres.len(), "Genres loaded");
        state.genres = genres;
        Ok(())
    }

    /// Create an active genre with no color from a bare name
    pub async fn quick_add(&self, name: &str) -> Result<Genre> {
        let row = GenreDraft::named(name).validate()?;
        let genre = {
            let _saving = self.saving.acquire()?;
            self.catalog.insert_genre(&row).await?
        };

        info!(genre_id = %genre.id, name = %genre.name, "Genre created");
        self.load().await?;
        Ok(genre)
    }

    /// Replace the form contents
    pub async fn set_form(&self, form: GenreDraft) {
        self.state.write().await.form = form;
    }

    /// Create or update from the form, depending on whether an edit is open
    pub async fn submit(&self) -> Result<Genre> {
        let (form, editing) = {
            let state = self.state.read().await;
            (state.form.clone(), state.editing.clone())
        };
        let row = form.validate()?;

        let genre = {
            let _saving = self.saving.acquire()?;
            match &editing {
                Some(id) => self.catalog.update_genre(id, &row).await?,
                None => self.catalog.insert_genre(&row).await?,
            }
        };

        if editing.is_some() {
            info!(genre_id = %genre.id, name = %genre.name, "Genre updated");
        } else {
            info!(genre_id = %genre.id, name = %genre.name, "Genre created");
        }

        self.reset_form().await;
        self.load().await?;
        Ok(genre)
    }

    /// Open a loaded genre in the form
    pub async fn edit(&self, id: &GenreId) -> Result<GenreDraft> {
        let mut state = self.state.write().await;
        let genre = state
            .genres
            .iter()
            .find(|g| &g.id == id)
            .ok_or_else(|| ViewError::not_found("genre", id))?;

        let form = GenreDraft::from_genre(genre);
        state.form = form.clone();
        state.editing = Some(id.clone());
        Ok(form)
    }

    /// Drop the form back to its empty create state
    pub async fn cancel(&self) {
        self.reset_form().await;
    }

    /// Delete a genre. Tracks that reference it are left alone.
    pub async fn delete(&self, id: &GenreId) -> Result<()> {
        self.catalog.delete_genre(id).await?;
        info!(genre_id = %id, "Genre deleted");

        {
            let mut state = self.state.write().await;
            if state.editing.as_ref() == Some(id) {
                state.form = GenreDraft::default();
                state.editing = None;
            }
        }

        self.load().await
    }

    /// Current screen state
    pub async fn state(&self) -> GenreEditorState {
        self.state.read().await.clone()
    }

    /// Loaded genres
    pub async fn genres(&self) -> Vec<Genre> {
        self.state.read().await.genres.clone()
    }

    /// Whether a submission is in flight
    pub fn is_saving(&self) -> bool {
        self.saving.is_set()
    }

    /// Forget everything (signed out); in-flight fetches are discarded
    pub async fn clear(&self) {
        self.fetches.begin();
        *self.state.write().await = GenreEditorState::default();
    }

    async fn reset_form(&self) {
        let mut state = self.state.write().await;
        state.form = GenreDraft::default();
        state.editing = None;
    }
}

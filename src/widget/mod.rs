#[cfg(test)]
mod tests;

use std::sync::{
    Arc, Mutex as StdMutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    search::{SearchError, SearchService},
    storage::{FavoritesSet, FavoritesStore, RepoId, StorageError},
    view::{ViewError, WidgetView, build_dropdown, render_favorite},
};

/// Errors surfaced by the widget's event handlers.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The search failed for a reason other than a non-success status.
    #[error("Search failed: {0}")]
    Search(#[from] SearchError),
    /// Loading or saving the favorites failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    /// Drawing on the view failed.
    #[error("View error: {0}")]
    View(#[from] ViewError),
}

type Result<T> = std::result::Result<T, WidgetError>;

/// Where the widget is between typing and picking a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WidgetState {
    /// No pending search, dropdown hidden.
    #[default]
    Idle,
    /// Waiting for the input to settle.
    Typing,
    /// A search request is in flight.
    Searching,
    /// The dropdown shows results.
    ResultsShown,
}

/// Ties the input, the search, the dropdown and the favorites together.
pub struct RepoWidget {
    search_service: Arc<dyn SearchService>,
    favorites_store: FavoritesStore,
    view: Arc<dyn WidgetView>,
    favorites: Mutex<FavoritesSet>,
    state: StdMutex<WidgetState>,
    // Token of the most recent search; responses carrying an older one are stale.
    latest_request: AtomicU64,
}

impl RepoWidget {
    /// Creates a widget with no favorites loaded yet; call [`RepoWidget::start`].
    pub fn new(
        search_service: Arc<dyn SearchService>,
        favorites_store: FavoritesStore,
        view: Arc<dyn WidgetView>,
    ) -> Self {
        Self {
            search_service,
            favorites_store,
            view,
            favorites: Mutex::new(FavoritesSet::new()),
            state: StdMutex::new(WidgetState::Idle),
            latest_request: AtomicU64::new(0),
        }
    }

    /// Load the persisted favorites and render a card for each of them.
    pub async fn start(&self) -> Result<()> {
        let loaded = self.favorites_store.load().await?;
        tracing::debug!("Rendering {} stored favorites", loaded.len());

        for (id, repo) in loaded.iter() {
            self.view.append_favorite(render_favorite(id, repo)).await?;
        }
        *self.favorites.lock().await = loaded;
        Ok(())
    }

    /// The current state of the widget.
    pub fn state(&self) -> WidgetState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: WidgetState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// A snapshot of the current favorites.
    pub async fn favorites(&self) -> FavoritesSet {
        self.favorites.lock().await.clone()
    }

    /// Record that input arrived and a search is scheduled.
    pub fn mark_typing(&self) {
        self.set_state(WidgetState::Typing);
    }

    /// Hide the dropdown right away, forget the last results and make any
    /// in-flight search stale.
    pub async fn clear_results(&self) -> Result<()> {
        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.search_service.clear(token).await;
        self.view.hide_dropdown().await?;
        self.set_state(WidgetState::Idle);
        Ok(())
    }

    /// Handle the input once it stopped changing: search and show the results.
    ///
    /// A non-success response from the search endpoint is reported to the user
    /// and swallowed; any other failure is returned.
    pub async fn input_settled(&self, value: &str) -> Result<()> {
        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;

        self.view.hide_dropdown().await?;
        if value.is_empty() {
            self.search_service.clear(token).await;
            self.set_state(WidgetState::Idle);
            return Ok(());
        }

        self.set_state(WidgetState::Searching);
        let outcome = self.search_service.search(value, token).await;

        if self.latest_request.load(Ordering::SeqCst) != token {
            tracing::debug!("Discarding stale search response for {value:?}");
            return Ok(());
        }

        match outcome {
            Ok(results) => {
                let dropdown = build_dropdown(&results);
                let state =
                    if dropdown.hidden { WidgetState::Idle } else { WidgetState::ResultsShown };
                self.view.render_dropdown(dropdown).await?;
                self.set_state(state);
                Ok(())
            }
            Err(err) => {
                self.set_state(WidgetState::Idle);
                let Some(status) = err.request_status() else {
                    return Err(err.into());
                };
                tracing::error!("Search request failed: {err}");
                self.view.alert(&format!("Request Error, Code: {}", status.as_u16())).await?;
                Ok(())
            }
        }
    }

    /// Pin a repository from the last search results to the favorites.
    pub async fn select(&self, id: &RepoId) -> Result<()> {
        let mut favorites = self.favorites.lock().await;
        if favorites.contains(id) {
            tracing::debug!("Repository {id} is already a favorite");
            return Ok(());
        }

        let Some(repo) = self.search_service.lookup(id).await else {
            tracing::warn!("Repository {id} is not among the last search results");
            return Ok(());
        };

        let mut updated = favorites.clone();
        updated.insert(id.clone(), repo.clone());
        self.favorites_store.save(&updated).await?;
        *favorites = updated;
        drop(favorites);
        tracing::debug!("Added favorite {id}: {}/{}", repo.owner, repo.name);

        self.view.append_favorite(render_favorite(id, &repo)).await?;
        self.view.clear_input().await?;
        self.view.hide_dropdown().await?;
        self.set_state(WidgetState::Idle);
        Ok(())
    }

    /// Unpin a repository and remove its card.
    pub async fn remove(&self, id: &RepoId) -> Result<()> {
        let mut favorites = self.favorites.lock().await;
        if !favorites.contains(id) {
            tracing::debug!("Repository {id} is not a favorite");
            return Ok(());
        }

        let mut updated = favorites.clone();
        updated.remove(id);
        self.favorites_store.save(&updated).await?;
        *favorites = updated;
        drop(favorites);
        tracing::debug!("Removed favorite {id}");

        self.view.remove_favorite(id).await?;
        Ok(())
    }
}

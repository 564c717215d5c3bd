/// The results dropdown model.
pub mod dropdown;
/// Favorite cards.
pub mod favorites;
/// A plain-text view on a terminal.
pub mod terminal;

use async_trait::async_trait;
pub use dropdown::{DropdownList, DropdownOption, build_dropdown};
pub use favorites::{FavoriteCard, render_favorite};
use mockall::automock;
use thiserror::Error;

use crate::storage::RepoId;

/// Errors raised while drawing the widget.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Writing to the output failed.
    #[error("Failed to write to the terminal: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type of view operations.
pub type ViewResult<T> = std::result::Result<T, ViewError>;

/// The surface the widget draws on: an input, a results dropdown, a list of
/// favorite cards and a way to alert the user.
#[automock]
#[async_trait]
pub trait WidgetView: Send + Sync {
    /// Replace the dropdown with `list`, showing or hiding it accordingly.
    async fn render_dropdown(&self, list: DropdownList) -> ViewResult<()>;

    /// Hide the dropdown and drop its options.
    async fn hide_dropdown(&self) -> ViewResult<()>;

    /// Clear the search input.
    async fn clear_input(&self) -> ViewResult<()>;

    /// Append a card to the favorites list.
    async fn append_favorite(&self, card: FavoriteCard) -> ViewResult<()>;

    /// Remove the card bound to `id` from the favorites list.
    async fn remove_favorite(&self, id: &RepoId) -> ViewResult<()>;

    /// Show a blocking message to the user.
    async fn alert(&self, message: &str) -> ViewResult<()>;
}

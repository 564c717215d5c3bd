mod favorites;
/// In-memory storage, for tests and ephemeral runs.
pub mod memory_storage;
mod repo_entity;
/// SQLite-backed storage.
pub mod sqlite;

use async_trait::async_trait;
pub use favorites::{FAVORITES_KEY, FavoritesStore};
use mockall::automock;
pub use repo_entity::{FavoritesSet, RepoId, RepoMap, RepoSummary, SearchResultSet};
use thiserror::Error;

/// Errors returned by the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database rejected a query or could not be reached.
    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
    /// The schema migration failed.
    #[error("Failed to migrate storage: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    /// The favorites could not be serialized.
    #[error("Failed to serialize favorites: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type of the storage layer.
pub type StorageResult<T> = Result<T, StorageError>;

/// String key-value storage, the persistence backend of the widget.
#[automock]
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Get the value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
}

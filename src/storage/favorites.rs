use std::sync::Arc;

use crate::storage::{FavoritesSet, KeyValueStorage, StorageResult};

/// Storage key holding the serialized favorites.
pub const FAVORITES_KEY: &str = "repos";

/// Loads and saves the favorites set as a JSON list of `[id, summary]` pairs.
#[derive(Clone)]
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl FavoritesStore {
    /// Creates a store over `storage`.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Load the persisted favorites. A missing or unreadable value yields an empty
    /// set.
    pub async fn load(&self) -> StorageResult<FavoritesSet> {
        let Some(raw) = self.storage.get_item(FAVORITES_KEY).await? else {
            tracing::debug!("No stored favorites found");
            return Ok(FavoritesSet::new());
        };

        match serde_json::from_str::<FavoritesSet>(&raw) {
            Ok(favorites) => {
                tracing::debug!("Loaded {} favorites", favorites.len());
                Ok(favorites)
            }
            Err(e) => {
                tracing::warn!("Stored favorites are invalid, starting empty: {e}");
                Ok(FavoritesSet::new())
            }
        }
    }

    /// Overwrite the persisted favorites with `favorites`.
    pub async fn save(&self, favorites: &FavoritesSet) -> StorageResult<()> {
        let raw = serde_json::to_string(favorites)?;
        self.storage.set_item(FAVORITES_KEY, &raw).await?;
        tracing::debug!("Saved {} favorites", favorites.len());
        Ok(())
    }
}

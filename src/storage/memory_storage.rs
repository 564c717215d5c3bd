use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::storage::{KeyValueStorage, StorageResult};

/// Key-value storage kept in memory for the lifetime of the process.
#[derive(Default)]
pub struct InMemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for InMemoryStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        tracing::debug!("Reading key from memory: {key}");
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        tracing::debug!("Writing key to memory: {key}");
        self.data.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

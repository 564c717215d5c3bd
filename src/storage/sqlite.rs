use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    Pool, Sqlite,
    migrate,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::storage::{KeyValueStorage, StorageResult};

/// Key-value storage backed by a single SQLite table.
pub struct SqliteStorage {
    pool: Pool<Sqlite>,
}

impl SqliteStorage {
    /// Connects to `database_url`, creating the database if missing, and runs the
    /// migrations.
    pub async fn new(database_url: &str) -> StorageResult<Self> {
        tracing::debug!("Connecting to SQLite database: {database_url}");
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // One connection: every `sqlite::memory:` connection is a separate database.
        let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await?;

        migrate!("./migrations").run(&pool).await?;
        tracing::debug!("SQLite database migrated");

        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyValueStorage for SqliteStorage {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        tracing::debug!("Reading key from SQLite: {key}");

        let value = sqlx::query_scalar::<_, String>("SELECT value FROM storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        tracing::debug!("Writing key to SQLite: {key}");

        sqlx::query(
            "INSERT INTO storage (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value \
             = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

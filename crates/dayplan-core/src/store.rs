//! Key-value record persistence.
//!
//! Every collection (the task list, the notes, the profile, ...) is stored as a
//! single JSON document under a fixed key. Readers load the whole document and
//! writers replace it.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::CoreError;

pub use sqlx::SqlitePool as DbPool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Tasks,
    Notes,
    UserProfile,
    CustomRewards,
    DailyPlan,
}

impl Collection {
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Tasks => "tasks",
            Collection::Notes => "notes",
            Collection::UserProfile => "userProfile",
            Collection::CustomRewards => "customRewards",
            Collection::DailyPlan => "dailyPlan",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whole-document storage keyed by collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The stored JSON document, or `None` if the collection was never saved.
    async fn load(&self, collection: Collection) -> Result<Option<String>, CoreError>;
    async fn save(&self, collection: Collection, value: String) -> Result<(), CoreError>;
    /// Writes every record or none of them.
    async fn save_all(&self, records: Vec<(Collection, String)>) -> Result<(), CoreError>;
}

const UPSERT: &str = r#"INSERT INTO records (key, value, updated_at) VALUES ($1, $2, $3)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#;

pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file at `db_path`.
    pub async fn connect(db_path: &str) -> Result<Self, CoreError> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// A private database that lives as long as the store.
    pub async fn in_memory() -> Result<Self, CoreError> {
        // A single connection that is never recycled: each new in-memory
        // connection would see an empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: DbPool) -> Result<Self, CoreError> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn load(&self, collection: Collection) -> Result<Option<String>, CoreError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM records WHERE key = $1")
            .bind(collection.key())
            .fetch_optional(&self.pool)
            .await?;
        debug!(%collection, found = value.is_some(), "loaded record");
        Ok(value)
    }

    async fn save(&self, collection: Collection, value: String) -> Result<(), CoreError> {
        sqlx::query(UPSERT)
            .bind(collection.key())
            .bind(&value)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        debug!(%collection, bytes = value.len(), "saved record");
        Ok(())
    }

    async fn save_all(&self, records: Vec<(Collection, String)>) -> Result<(), CoreError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        for (collection, value) in &records {
            sqlx::query(UPSERT)
                .bind(collection.key())
                .bind(value)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!(count = records.len(), "saved records in one transaction");
        Ok(())
    }
}

/// Records held in process memory.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<Collection, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self, collection: Collection) -> Result<Option<String>, CoreError> {
        Ok(self.records.lock().await.get(&collection).cloned())
    }

    async fn save(&self, collection: Collection, value: String) -> Result<(), CoreError> {
        self.records.lock().await.insert(collection, value);
        Ok(())
    }

    async fn save_all(&self, records: Vec<(Collection, String)>) -> Result<(), CoreError> {
        self.records.lock().await.extend(records);
        Ok(())
    }
}

//! Durable key-value slots.
//!
//! A write replaces the whole value of a slot; readers see either the old or the new value.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// Key-value storage holding serialized snapshots.
#[async_trait]
pub trait SlotStorage: Send + Sync {
    /// Read a slot, `None` when it was never written.
    async fn read_slot(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Replace the value of a slot.
    async fn write_slot(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Slots stored in the SQLite `slots` table.
#[derive(Clone)]
pub struct SqliteSlots {
    pool: SqlitePool,
}

impl SqliteSlots {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotStorage for SqliteSlots {
    async fn read_slot(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM slots WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO slots (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Slot {} written ({} bytes)", key, value.len());
        Ok(())
    }
}

/// In-memory slots with switchable write failures.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySlots {
    values: std::sync::Mutex<std::collections::HashMap<String, String>>,
    fail_writes: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl MemorySlots {
    pub fn with_value(key: &str, value: &str) -> Self {
        let slots = Self::default();
        slots
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        slots
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[cfg(test)]
#[async_trait]
impl SlotStorage for MemorySlots {
    async fn read_slot(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.value(key))
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<(), AppError> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AppError::Storage("quota exceeded".to_string()));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sqlite_slot_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("slots.sqlite"))
            .await
            .unwrap();
        let slots = SqliteSlots::new(pool);

        assert_eq!(slots.read_slot("missing").await.unwrap(), None);

        slots.write_slot("k", "first").await.unwrap();
        slots.write_slot("k", "second").await.unwrap();
        assert_eq!(slots.read_slot("k").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_sqlite_slots_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("slots.sqlite");

        {
            let pool = init_database(&db_path).await.unwrap();
            SqliteSlots::new(pool.clone())
                .write_slot("k", "[]")
                .await
                .unwrap();
            pool.close().await;
        }

        let pool = init_database(&db_path).await.unwrap();
        let value = SqliteSlots::new(pool).read_slot("k").await.unwrap();
        assert_eq!(value.as_deref(), Some("[]"));
    }
}

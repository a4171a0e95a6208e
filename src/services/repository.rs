//! Note storage: the record store behind the board.
//!
//! DESIGN
//! ======
//! Notes are stored one row per id with the JSON-encoded `NoteRecord` as the
//! payload, so fields added to the record never need a schema change. The
//! in-memory implementation backs tests and dry runs.

use std::collections::HashMap;

use async_trait::async_trait;
use canvas::doc::{NoteId, NoteRecord};
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("record encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key-value record store keyed by note id.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Load every stored note.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store can't be read.
    async fn get_all(&self) -> Result<Vec<NoteRecord>, StoreError>;

    /// Insert or replace the record with the same id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    async fn put(&self, record: &NoteRecord) -> Result<(), StoreError>;

    /// Remove a note. Missing ids are not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    async fn delete_by_id(&self, id: NoteId) -> Result<(), StoreError>;

    /// Replace the whole collection atomically.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails; the previous contents remain.
    async fn replace_all(&self, records: &[NoteRecord]) -> Result<(), StoreError>;
}

// =============================================================================
// SQLITE
// =============================================================================

pub struct SqliteNoteRepository {
    pool: SqlitePool,
}

impl SqliteNoteRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    async fn get_all(&self) -> Result<Vec<NoteRecord>, StoreError> {
        let rows = sqlx::query_as::<_, (String, String)>("SELECT id, record FROM notes ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        // EDGE: a corrupt row is skipped so one bad record can't hide the rest.
        let mut records = Vec::with_capacity(rows.len());
        for (id, raw) in rows {
            match serde_json::from_str::<NoteRecord>(&raw) {
                Ok(record) => records.push(record),
                Err(e) => warn!(%id, error = %e, "skipping corrupt note record"),
            }
        }
        Ok(records)
    }

    async fn put(&self, record: &NoteRecord) -> Result<(), StoreError> {
        let raw = serde_json::to_string(record)?;
        sqlx::query(
            "INSERT INTO notes (id, record) VALUES (?, ?)
             ON CONFLICT(id) DO UPDATE SET record = excluded.record",
        )
        .bind(record.id.to_string())
        .bind(raw)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace_all(&self, records: &[NoteRecord]) -> Result<(), StoreError> {
        // Encode everything before touching the table.
        let rows = records
            .iter()
            .map(|r| serde_json::to_string(r).map(|raw| (r.id.to_string(), raw)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM notes").execute(&mut *tx).await?;
        for (id, raw) in rows {
            sqlx::query("INSERT OR REPLACE INTO notes (id, record) VALUES (?, ?)")
                .bind(id)
                .bind(raw)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Default)]
pub struct MemoryNoteRepository {
    records: RwLock<HashMap<NoteId, NoteRecord>>,
}

impl MemoryNoteRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn get_all(&self) -> Result<Vec<NoteRecord>, StoreError> {
        let mut records: Vec<NoteRecord> = self.records.read().await.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    async fn put(&self, record: &NoteRecord) -> Result<(), StoreError> {
        self.records.write().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<(), StoreError> {
        self.records.write().await.remove(&id);
        Ok(())
    }

    async fn replace_all(&self, records: &[NoteRecord]) -> Result<(), StoreError> {
        let mut guard = self.records.write().await;
        guard.clear();
        guard.extend(records.iter().map(|r| (r.id, r.clone())));
        Ok(())
    }
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;

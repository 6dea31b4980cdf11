//! Generation history: a newest-first list of past runs, capped at
//! `MAX_HISTORY_ENTRIES`, kept in a single keyed record.
//!
//! `HistoryRepository` owns the list semantics (prepend, cap, remove) so every
//! `HistoryStore` backend only has to read and write the whole record. Writes
//! are read-modify-write with no locking; concurrent writers can clobber each
//! other.

pub mod handlers;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::history::{HistoryEntry, NewHistoryEntry};

pub const MAX_HISTORY_ENTRIES: usize = 20;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage medium for the history record.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Reads the whole list. A missing record is an empty list.
    async fn read(&self) -> Result<Vec<HistoryEntry>, HistoryError>;
    async fn write(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError>;
    /// Deletes the record outright.
    async fn delete(&self) -> Result<(), HistoryError>;
}

#[derive(Clone)]
pub struct HistoryRepository {
    store: Arc<dyn HistoryStore>,
}

impl HistoryRepository {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        self.store.read().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<HistoryEntry>, HistoryError> {
        Ok(self.load().await?.into_iter().find(|e| e.id == id))
    }

    /// Prepends a new entry, evicting the oldest beyond the cap.
    pub async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, HistoryError> {
        let mut entries = self.store.read().await?;
        let created = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            job_title: entry.job_title,
            company_name: entry.company_name,
            questions: entry.questions,
            resume_preview: entry.resume_preview,
        };

        entries.insert(0, created.clone());
        entries.truncate(MAX_HISTORY_ENTRIES);
        self.store.write(&entries).await?;

        info!("Saved history entry {} ({} total)", created.id, entries.len());
        Ok(created)
    }

    /// Removes the entry with `id`. Returns whether anything was removed.
    pub async fn remove(&self, id: &str) -> Result<bool, HistoryError> {
        let mut entries = self.store.read().await?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        self.store.write(&entries).await?;
        Ok(entries.len() != before)
    }

    pub async fn clear(&self) -> Result<(), HistoryError> {
        self.store.delete().await
    }
}

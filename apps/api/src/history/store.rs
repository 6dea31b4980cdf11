use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::warn;

use crate::history::{HistoryError, HistoryStore};
use crate::models::history::HistoryEntry;

pub const DEFAULT_HISTORY_KEY: &str = "interview_questions_history";

/// Keeps the record in process memory. Lost on restart.
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: RwLock<Vec<HistoryEntry>>,
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn read(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        Ok(self.entries.read().await.clone())
    }

    async fn write(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        *self.entries.write().await = entries.to_vec();
        Ok(())
    }

    async fn delete(&self) -> Result<(), HistoryError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

/// Keeps the record as one JSON array under a single Redis key.
pub struct RedisHistoryStore {
    client: redis::Client,
    key: String,
}

impl RedisHistoryStore {
    pub fn new(client: redis::Client, key: impl Into<String>) -> Self {
        Self {
            client,
            key: key.into(),
        }
    }
}

/// An unreadable record loads as an empty history rather than an error.
fn decode_record(raw: Option<String>) -> Vec<HistoryEntry> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("Discarding unreadable history record: {e}");
        Vec::new()
    })
}

#[async_trait]
impl HistoryStore for RedisHistoryStore {
    async fn read(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(&self.key).await?;
        Ok(decode_record(raw))
    }

    async fn write(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let payload = serde_json::to_string(entries)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(&self.key, payload).await?;
        Ok(())
    }

    async fn delete(&self) -> Result<(), HistoryError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(&self.key).await?;
        Ok(())
    }
}

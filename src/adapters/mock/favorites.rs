//! In-memory favorites store for testing.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::error::{AppResult, StorageError};
use crate::models::FavoriteRecord;
use crate::stream::LiveStream;
use crate::traits::FavoriteStore;

/// In-memory favorites store.
///
/// Shares the live-query behavior of the file store (current set first,
/// then every change) and can be told to fail writes.
#[derive(Debug, Clone)]
pub struct InMemoryFavoriteStore {
    records: Arc<watch::Sender<Vec<FavoriteRecord>>>,
    /// Whether insert/delete should fail
    write_should_fail: Arc<Mutex<bool>>,
    /// Number of successful writes
    writes: Arc<Mutex<usize>>,
}

impl InMemoryFavoriteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a store holding `records`.
    pub fn with_records(records: Vec<FavoriteRecord>) -> Self {
        let (tx, _) = watch::channel(records);
        Self {
            records: Arc::new(tx),
            write_should_fail: Arc::new(Mutex::new(false)),
            writes: Arc::new(Mutex::new(0)),
        }
    }

    /// Configure whether writes should fail.
    pub fn set_write_should_fail(&self, should_fail: bool) {
        *self.write_should_fail.lock().unwrap() = should_fail;
    }

    /// Current records, synchronously.
    pub fn records(&self) -> Vec<FavoriteRecord> {
        self.records.borrow().clone()
    }

    /// Number of successful inserts and deletes so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn check_write(&self, key: &str) -> AppResult<()> {
        if *self.write_should_fail.lock().unwrap() {
            return Err(StorageError::InvalidValue {
                key: key.to_string(),
                value: "mock write failure".to_string(),
            }
            .into());
        }
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

impl Default for InMemoryFavoriteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FavoriteStore for InMemoryFavoriteStore {
    async fn insert(&self, record: FavoriteRecord) -> AppResult<()> {
        self.check_write(&record.id)?;
        self.records.send_modify(|rows| {
            match rows.iter_mut().find(|row| row.id == record.id) {
                Some(existing) => *existing = record,
                None => rows.push(record),
            }
        });
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.check_write(id)?;
        self.records.send_if_modified(|rows| {
            let before = rows.len();
            rows.retain(|row| row.id != id);
            rows.len() != before
        });
        Ok(())
    }

    async fn all(&self) -> AppResult<Vec<FavoriteRecord>> {
        Ok(self.records())
    }

    fn watch_all(&self) -> LiveStream<Vec<FavoriteRecord>> {
        WatchStream::new(self.records.subscribe()).map(Ok).boxed()
    }
}

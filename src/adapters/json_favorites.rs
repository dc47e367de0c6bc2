//! File-backed favorites store.
//!
//! Favorites are kept in `<data_dir>/favorites.json` as an array of
//! `{ "id", "symbol" }` rows. The in-memory copy lives in a `watch` channel
//! so the live query can hand every subscriber the full current set.

use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::sync::{watch, Mutex};
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use super::json_file::{load_or_default, write_atomic};
use crate::error::AppResult;
use crate::models::FavoriteRecord;
use crate::stream::LiveStream;
use crate::traits::FavoriteStore;

/// The favorites file name.
pub const FAVORITES_FILE: &str = "favorites.json";

/// JSON-file favorites store.
#[derive(Debug)]
pub struct JsonFavoriteStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles so concurrent writers from
    /// different screens never lose a row.
    write_lock: Mutex<()>,
    records: watch::Sender<Vec<FavoriteRecord>>,
}

impl JsonFavoriteStore {
    /// Open the store at an explicit file path, loading existing rows.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let rows: Vec<FavoriteRecord> = load_or_default(&path)?;
        debug!("Loaded {} favorites from {}", rows.len(), path.display());

        let (records, _) = watch::channel(rows);
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
            records,
        })
    }

    /// Open `favorites.json` inside `data_dir`.
    pub fn open_in(data_dir: &Path) -> AppResult<Self> {
        Self::open(data_dir.join(FAVORITES_FILE))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn commit(&self, rows: Vec<FavoriteRecord>) -> AppResult<()> {
        write_atomic(&self.path, &rows).await?;
        self.records.send_replace(rows);
        Ok(())
    }
}

#[async_trait]
impl FavoriteStore for JsonFavoriteStore {
    async fn insert(&self, record: FavoriteRecord) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut rows = self.records.borrow().clone();
        match rows.iter_mut().find(|row| row.id == record.id) {
            Some(existing) => *existing = record,
            None => rows.push(record),
        }
        self.commit(rows).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut rows = self.records.borrow().clone();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Ok(());
        }
        self.commit(rows).await
    }

    async fn all(&self) -> AppResult<Vec<FavoriteRecord>> {
        Ok(self.records.borrow().clone())
    }

    fn watch_all(&self) -> LiveStream<Vec<FavoriteRecord>> {
        WatchStream::new(self.records.subscribe()).map(Ok).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_insert_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let store = JsonFavoriteStore::open_in(dir.path()).unwrap();

        store
            .insert(FavoriteRecord::new("bitcoin", "BTC"))
            .await
            .unwrap();
        store
            .insert(FavoriteRecord::new("euro", "EUR"))
            .await
            .unwrap();

        let reopened = JsonFavoriteStore::open_in(dir.path()).unwrap();
        assert_eq!(
            reopened.all().await.unwrap(),
            vec![
                FavoriteRecord::new("bitcoin", "BTC"),
                FavoriteRecord::new("euro", "EUR")
            ]
        );
    }

    #[tokio::test]
    async fn test_insert_replaces_by_id() {
        let dir = TempDir::new().unwrap();
        let store = JsonFavoriteStore::open_in(dir.path()).unwrap();

        store.insert(FavoriteRecord::new("1", "$")).await.unwrap();
        store.insert(FavoriteRecord::new("1", "€")).await.unwrap();

        assert_eq!(
            store.all().await.unwrap(),
            vec![FavoriteRecord::new("1", "€")]
        );
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = JsonFavoriteStore::open_in(dir.path()).unwrap();
        store.delete("ghost").await.unwrap();
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_watch_all_emits_current_then_changes() {
        let dir = TempDir::new().unwrap();
        let store = JsonFavoriteStore::open_in(dir.path()).unwrap();
        let mut live = store.watch_all();

        assert_eq!(live.next().await.unwrap().unwrap(), vec![]);

        store.insert(FavoriteRecord::new("1", "$")).await.unwrap();
        assert_eq!(
            live.next().await.unwrap().unwrap(),
            vec![FavoriteRecord::new("1", "$")]
        );

        store.delete("1").await.unwrap();
        assert_eq!(live.next().await.unwrap().unwrap(), vec![]);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_keep_every_row() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(JsonFavoriteStore::open_in(dir.path()).unwrap());

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert(FavoriteRecord::new(i.to_string(), format!("S{}", i)))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.all().await.unwrap().len(), 10);
    }
}

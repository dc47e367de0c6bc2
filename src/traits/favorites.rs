//! Favorites row store abstraction.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::FavoriteRecord;
use crate::stream::LiveStream;

/// Persistent table of favorite rates, keyed by rate id.
///
/// Implementations serialize their own writes; callers never lock.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Insert a record, replacing any record with the same id.
    async fn insert(&self, record: FavoriteRecord) -> AppResult<()>;

    /// Delete the record with the given id. Deleting a missing id is a no-op.
    async fn delete(&self, id: &str) -> AppResult<()>;

    /// Snapshot of every stored record.
    async fn all(&self) -> AppResult<Vec<FavoriteRecord>>;

    /// Live query: yields the full set immediately, then again after every
    /// change. Never ends while the store is alive.
    fn watch_all(&self) -> LiveStream<Vec<FavoriteRecord>>;
}

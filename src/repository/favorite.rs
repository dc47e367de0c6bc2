//! Favorites keyed by rate.

use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{FavoriteRecord, Rate};
use crate::stream::LiveStream;
use crate::traits::FavoriteStore;

/// Maps rates onto the favorites row store.
#[derive(Clone)]
pub struct FavoriteRepository {
    store: Arc<dyn FavoriteStore>,
}

impl FavoriteRepository {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self { store }
    }

    /// Store a favorite row for `rate`.
    pub async fn add(&self, rate: &Rate) -> AppResult<()> {
        tracing::info!("Adding favorite {} ({})", rate.id, rate.symbol);
        self.store.insert(FavoriteRecord::from(rate)).await
    }

    /// Delete the favorite row for `rate`'s id.
    pub async fn remove(&self, rate: &Rate) -> AppResult<()> {
        tracing::info!("Removing favorite {} ({})", rate.id, rate.symbol);
        self.store.delete(&rate.id).await
    }

    /// Current rows.
    pub async fn records(&self) -> AppResult<Vec<FavoriteRecord>> {
        self.store.all().await
    }

    /// Live rows: the current set, then every change.
    pub fn watch_records(&self) -> LiveStream<Vec<FavoriteRecord>> {
        self.store.watch_all()
    }
}

impl std::fmt::Debug for FavoriteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoriteRepository").finish_non_exhaustive()
    }
}

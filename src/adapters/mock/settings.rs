//! In-memory settings store for testing.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::error::AppResult;
use crate::stream::LiveStream;
use crate::traits::SettingsStore;

/// In-memory settings store.
#[derive(Debug, Clone)]
pub struct InMemorySettingsStore {
    theme: Arc<watch::Sender<Option<String>>>,
}

impl InMemorySettingsStore {
    /// Create a store with no theme set.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { theme: Arc::new(tx) }
    }

    /// Create a store with a stored theme name.
    pub fn with_theme(name: &str) -> Self {
        let store = Self::new();
        store.theme.send_replace(Some(name.to_string()));
        store
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn theme_name(&self) -> AppResult<Option<String>> {
        Ok(self.theme.borrow().clone())
    }

    async fn set_theme_name(&self, name: &str) -> AppResult<()> {
        self.theme.send_replace(Some(name.to_string()));
        Ok(())
    }

    fn watch_theme_name(&self) -> LiveStream<Option<String>> {
        WatchStream::new(self.theme.subscribe()).map(Ok).boxed()
    }
}

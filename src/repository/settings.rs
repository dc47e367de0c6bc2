//! Typed access to stored settings.

use futures::StreamExt;
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::ThemeType;
use crate::stream::LiveStream;
use crate::traits::SettingsStore;

/// Theme preference on top of the settings store. A missing or unknown
/// stored value reads as [`ThemeType::System`].
#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn SettingsStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Stored theme.
    pub async fn current_theme(&self) -> AppResult<ThemeType> {
        let name = self.store.theme_name().await?;
        Ok(ThemeType::from_stored(name.as_deref()))
    }

    /// Live theme: the stored value, then every change.
    pub fn theme(&self) -> LiveStream<ThemeType> {
        self.store
            .watch_theme_name()
            .map(|name| name.map(|name| ThemeType::from_stored(name.as_deref())))
            .boxed()
    }

    /// Persist a theme.
    pub async fn set_theme(&self, theme: ThemeType) -> AppResult<()> {
        tracing::info!("Theme set to {}", theme);
        self.store.set_theme_name(theme.as_str()).await
    }
}

impl std::fmt::Debug for SettingsRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsRepository").finish_non_exhaustive()
    }
}

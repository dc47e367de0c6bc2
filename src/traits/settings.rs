//! Key-value settings store abstraction.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::stream::LiveStream;

/// Persistent key-value settings. Only the theme preference is stored today;
/// values are kept as their stored names so an unknown value written by a
/// newer build does not fail the read.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Stored theme name, if one was ever set.
    async fn theme_name(&self) -> AppResult<Option<String>>;

    /// Persist a theme name.
    async fn set_theme_name(&self, name: &str) -> AppResult<()>;

    /// Live view of the stored theme name: current value first, then every
    /// change.
    fn watch_theme_name(&self) -> LiveStream<Option<String>>;
}

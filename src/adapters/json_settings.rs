//! File-backed settings store (`<data_dir>/settings.json`).

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::{watch, Mutex};
use tokio_stream::wrappers::WatchStream;

use super::json_file::{load_or_default, write_atomic};
use crate::error::AppResult;
use crate::stream::LiveStream;
use crate::traits::SettingsStore;

/// The settings file name.
pub const SETTINGS_FILE: &str = "settings.json";

/// On-disk layout of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
}

/// JSON-file settings store.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    settings: watch::Sender<SettingsFile>,
}

impl JsonSettingsStore {
    /// Open the store at an explicit file path.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let settings: SettingsFile = load_or_default(&path)?;
        let (settings, _) = watch::channel(settings);
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
            settings,
        })
    }

    /// Open `settings.json` inside `data_dir`.
    pub fn open_in(data_dir: &Path) -> AppResult<Self> {
        Self::open(data_dir.join(SETTINGS_FILE))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn theme_name(&self) -> AppResult<Option<String>> {
        Ok(self.settings.borrow().theme.clone())
    }

    async fn set_theme_name(&self, name: &str) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut next = self.settings.borrow().clone();
        next.theme = Some(name.to_string());
        write_atomic(&self.path, &next).await?;
        self.settings.send_replace(next);
        Ok(())
    }

    fn watch_theme_name(&self) -> LiveStream<Option<String>> {
        WatchStream::new(self.settings.subscribe())
            .map(|settings| Ok(settings.theme))
            .boxed()
    }
}

//! Application configuration.
//!
//! Defaults can be overridden with the builder methods or from the
//! environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `RATEWATCH_BASE_URL` | `https://api.coincap.io/v2` |
//! | `RATEWATCH_DATA_DIR` | `~/.ratewatch` |
//! | `RATEWATCH_LIVE_INTERVAL_MS` | 3000 |
//! | `RATEWATCH_FAVORITE_INTERVAL_MS` | 4000 |
//! | `RATEWATCH_DETAIL_INTERVAL_MS` | 3000 |
//! | `RATEWATCH_OFFLINE` | unset (`1` disables the connectivity probe) |

use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::http_connectivity::PROBE_INTERVAL_SECS;
use crate::api::DEFAULT_BASE_URL;
use crate::error::{AppError, AppResult, StorageError};
use crate::interactor::{DEFAULT_DETAIL_INTERVAL, DEFAULT_FAVORITE_INTERVAL, DEFAULT_LIVE_INTERVAL};
use crate::screen::services::{DEFAULT_SEARCH_DEBOUNCE, ONLINE_BANNER_DURATION};
use crate::screen::ScreenTiming;

pub const ENV_BASE_URL: &str = "RATEWATCH_BASE_URL";
pub const ENV_DATA_DIR: &str = "RATEWATCH_DATA_DIR";
pub const ENV_LIVE_INTERVAL_MS: &str = "RATEWATCH_LIVE_INTERVAL_MS";
pub const ENV_FAVORITE_INTERVAL_MS: &str = "RATEWATCH_FAVORITE_INTERVAL_MS";
pub const ENV_DETAIL_INTERVAL_MS: &str = "RATEWATCH_DETAIL_INTERVAL_MS";
pub const ENV_OFFLINE: &str = "RATEWATCH_OFFLINE";

/// Name of the data directory under the home directory.
pub const DATA_DIR_NAME: &str = ".ratewatch";

/// `~/.ratewatch`, if a home directory exists.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// Configuration for building the app.
///
/// # Example
///
/// ```ignore
/// use ratewatch::startup::AppConfig;
///
/// let config = AppConfig::default()
///     .with_base_url("http://localhost:8080")
///     .with_offline(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Root of the rates API
    pub base_url: String,
    /// Where favorites.json and settings.json live
    pub data_dir: PathBuf,
    /// Poll interval of the home list
    pub live_interval: Duration,
    /// Poll interval of the favorites list
    pub favorite_interval: Duration,
    /// Poll interval of the detail view
    pub detail_interval: Duration,
    /// Quiet period before a search runs
    pub search_debounce: Duration,
    /// Connectivity probe interval
    pub probe_interval: Duration,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Consecutive retries when probing is disabled (`None` = forever)
    pub retry_attempts: Option<u32>,
    /// Delay between those retries
    pub retry_delay: Duration,
    /// Skip the connectivity probe and assume online
    pub offline: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: default_data_dir().unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME)),
            live_interval: DEFAULT_LIVE_INTERVAL,
            favorite_interval: DEFAULT_FAVORITE_INTERVAL,
            detail_interval: DEFAULT_DETAIL_INTERVAL,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            probe_interval: Duration::from_secs(PROBE_INTERVAL_SECS),
            request_timeout: Duration::from_secs(15),
            retry_attempts: Some(3),
            retry_delay: Duration::from_secs(1),
            offline: false,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_live_interval(mut self, interval: Duration) -> Self {
        self.live_interval = interval;
        self
    }

    pub fn with_favorite_interval(mut self, interval: Duration) -> Self {
        self.favorite_interval = interval;
        self
    }

    pub fn with_detail_interval(mut self, interval: Duration) -> Self {
        self.detail_interval = interval;
        self
    }

    pub fn with_search_debounce(mut self, period: Duration) -> Self {
        self.search_debounce = period;
        self
    }

    pub fn with_probe_interval(mut self, interval: Duration) -> Self {
        self.probe_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, attempts: Option<u32>, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Screen timings derived from this config.
    pub fn timing(&self) -> ScreenTiming {
        ScreenTiming {
            live_interval: self.live_interval,
            favorite_interval: self.favorite_interval,
            detail_interval: self.detail_interval,
            search_debounce: self.search_debounce,
            online_banner: ONLINE_BANNER_DURATION,
        }
    }

    /// Build from the process environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable lookup. Unset or empty variables keep their
    /// defaults; malformed ones are errors.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_BASE_URL) {
            config.base_url = url.trim().to_string();
        }

        match get(ENV_DATA_DIR) {
            Some(dir) => config.data_dir = PathBuf::from(dir),
            None => config.data_dir = default_data_dir().ok_or(StorageError::NoDataDirectory)?,
        }

        if let Some(ms) = get(ENV_LIVE_INTERVAL_MS) {
            config.live_interval = parse_interval_millis(ENV_LIVE_INTERVAL_MS, &ms)?;
        }
        if let Some(ms) = get(ENV_FAVORITE_INTERVAL_MS) {
            config.favorite_interval = parse_interval_millis(ENV_FAVORITE_INTERVAL_MS, &ms)?;
        }
        if let Some(ms) = get(ENV_DETAIL_INTERVAL_MS) {
            config.detail_interval = parse_interval_millis(ENV_DETAIL_INTERVAL_MS, &ms)?;
        }

        config.offline = get(ENV_OFFLINE)
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(config)
    }
}

/// Parse a poll interval. Zero is rejected: the screens would refetch in a
/// tight loop.
fn parse_interval_millis(variable: &str, value: &str) -> AppResult<Duration> {
    let message = match value.trim().parse::<u64>() {
        Ok(0) => "a poll interval must be at least 1 ms".to_string(),
        Ok(ms) => return Ok(Duration::from_millis(ms)),
        Err(_) => format!("expected a number of milliseconds, got '{}'", value),
    };
    Err(AppError::Configuration {
        variable: variable.to_string(),
        message,
    })
}

//! Everything a screen needs, bundled once at startup.

use std::sync::Arc;
use std::time::Duration;

use crate::interactor::{
    FavoriteInteractor, RateInteractor, DEFAULT_DETAIL_INTERVAL, DEFAULT_FAVORITE_INTERVAL,
    DEFAULT_LIVE_INTERVAL,
};
use crate::repository::SettingsRepository;
use crate::stream::RetryPolicy;
use crate::traits::ConnectivityMonitor;

/// Default quiet period before a search query is run.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// How long the "back online" banner stays up.
pub const ONLINE_BANNER_DURATION: Duration = Duration::from_millis(2000);

/// Poll and debounce timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenTiming {
    pub live_interval: Duration,
    pub favorite_interval: Duration,
    pub detail_interval: Duration,
    pub search_debounce: Duration,
    pub online_banner: Duration,
}

impl Default for ScreenTiming {
    fn default() -> Self {
        Self {
            live_interval: DEFAULT_LIVE_INTERVAL,
            favorite_interval: DEFAULT_FAVORITE_INTERVAL,
            detail_interval: DEFAULT_DETAIL_INTERVAL,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            online_banner: ONLINE_BANNER_DURATION,
        }
    }
}

/// Shared collaborators of all screens. Cheap to clone.
#[derive(Clone)]
pub struct Services {
    pub rates: RateInteractor,
    pub favorites: FavoriteInteractor,
    pub settings: SettingsRepository,
    pub connectivity: Arc<dyn ConnectivityMonitor>,
    /// Policy applied to every live pipeline.
    pub retry: RetryPolicy,
    pub timing: ScreenTiming,
}

impl Services {
    /// Bundle collaborators with default timings, retrying whenever
    /// connectivity allows.
    pub fn new(
        rates: RateInteractor,
        favorites: FavoriteInteractor,
        settings: SettingsRepository,
        connectivity: Arc<dyn ConnectivityMonitor>,
    ) -> Self {
        Self {
            retry: RetryPolicy::when_online(connectivity.clone()),
            rates,
            favorites,
            settings,
            connectivity,
            timing: ScreenTiming::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timing(mut self, timing: ScreenTiming) -> Self {
        self.timing = timing;
        self
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("retry", &self.retry)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

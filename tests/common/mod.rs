//! Common test utilities for integration tests.
//!
//! Builds [`Services`] over the in-memory adapters so a test can script
//! rates, favorites, settings and connectivity directly.
//!
//! # Example
//!
//! ```ignore
//! let h = Harness::new(vec![rate("bitcoin", "BTC", "43000.5")]);
//! let screen = HomeScreen::open(h.services.clone());
//! ```

#![allow(dead_code)]

use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use ratewatch::adapters::mock::{
    InMemoryFavoriteStore, InMemorySettingsStore, ManualConnectivity, ScriptedRates,
};
use ratewatch::error::NetworkError;
use ratewatch::interactor::{FavoriteInteractor, RateInteractor};
use ratewatch::models::{Rate, RateDetail};
use ratewatch::repository::{FavoriteRepository, SettingsRepository};
use ratewatch::screen::{ScreenTiming, Services};
use ratewatch::stream::RetryPolicy;

/// Creates a rate with the given id, symbol and USD value.
pub fn rate(id: &str, symbol: &str, usd: &str) -> Rate {
    Rate {
        id: id.to_string(),
        symbol: symbol.to_string(),
        currency_symbol: None,
        rate_type: "crypto".to_string(),
        rate_usd: Decimal::from_str(usd).unwrap(),
    }
}

/// Creates a detail for `rate` stamped at `timestamp`.
pub fn detail(rate: &Rate, timestamp: i64) -> RateDetail {
    RateDetail {
        id: rate.id.clone(),
        symbol: rate.symbol.clone(),
        currency_symbol: rate.currency_symbol.clone(),
        rate_type: rate.rate_type.clone(),
        rate_usd: rate.rate_usd,
        timestamp,
    }
}

/// A transient failure, as if the host were unreachable.
pub fn offline_error() -> NetworkError {
    NetworkError::ConnectionFailed {
        url: "http://api.test/rates".to_string(),
        message: "connection refused".to_string(),
    }
}

/// Short intervals for tests that run on paused time.
pub fn test_timing() -> ScreenTiming {
    ScreenTiming {
        live_interval: Duration::from_millis(100),
        favorite_interval: Duration::from_millis(100),
        detail_interval: Duration::from_millis(100),
        search_debounce: Duration::from_millis(300),
        online_banner: Duration::from_millis(2000),
    }
}

/// Services plus handles onto every scripted adapter behind them.
pub struct Harness {
    pub services: Services,
    pub rates: ScriptedRates,
    pub favorites: InMemoryFavoriteStore,
    pub settings: InMemorySettingsStore,
    pub connectivity: ManualConnectivity,
}

impl Harness {
    /// Online, no favorites, no stored theme, auto-retry with no settle.
    pub fn new(rates: Vec<Rate>) -> Self {
        Self::with_favorites(rates, InMemoryFavoriteStore::new())
    }

    pub fn with_favorites(rates: Vec<Rate>, favorites: InMemoryFavoriteStore) -> Self {
        let scripted = ScriptedRates::new(rates);
        let settings = InMemorySettingsStore::new();
        let connectivity = ManualConnectivity::new(true);

        let rate_interactor = RateInteractor::new(Arc::new(scripted.clone()));
        let favorite_interactor = FavoriteInteractor::new(
            rate_interactor.clone(),
            FavoriteRepository::new(Arc::new(favorites.clone())),
        );
        let services = Services::new(
            rate_interactor,
            favorite_interactor,
            SettingsRepository::new(Arc::new(settings.clone())),
            Arc::new(connectivity.clone()),
        )
        .with_retry(
            RetryPolicy::when_online(Arc::new(connectivity.clone())).with_settle(Duration::ZERO),
        )
        .with_timing(test_timing());

        Self {
            services,
            rates: scripted,
            favorites,
            settings,
            connectivity,
        }
    }

    /// Switch to a fixed retry policy.
    pub fn with_fixed_retry(mut self, max_attempts: Option<u32>, delay: Duration) -> Self {
        self.services = self
            .services
            .with_retry(RetryPolicy::fixed(max_attempts, delay));
        self
    }
}

/// Record every value a watch channel publishes, starting with the current one.
pub fn record<S>(mut rx: watch::Receiver<S>) -> Arc<Mutex<Vec<S>>>
where
    S: Clone + Send + Sync + 'static,
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    tokio::spawn(async move {
        loop {
            let value = rx.borrow_and_update().clone();
            sink.lock().unwrap().push(value);
            if rx.changed().await.is_err() {
                break;
            }
        }
    });
    seen
}

/// Wait until the channel holds a value matching `pred`, failing after 30
/// (virtual) seconds.
pub async fn wait_for<S, F>(rx: &mut watch::Receiver<S>, pred: F) -> S
where
    S: Clone,
    F: Fn(&S) -> bool,
{
    tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            {
                let value = rx.borrow_and_update();
                if pred(&*value) {
                    return (*value).clone();
                }
            }
            rx.changed().await.expect("state channel closed");
        }
    })
    .await
    .expect("timed out waiting for state")
}

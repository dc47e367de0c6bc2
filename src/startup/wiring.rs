//! Build the collaborator graph from an [`AppConfig`].

use std::sync::Arc;

use super::config::AppConfig;
use crate::adapters::{
    HttpConnectivityMonitor, JsonFavoriteStore, JsonSettingsStore, ManualConnectivity,
    ReqwestHttpClient,
};
use crate::api::RateApiClient;
use crate::error::AppResult;
use crate::interactor::{FavoriteInteractor, RateInteractor};
use crate::repository::{FavoriteRepository, RemoteRateRepository, SettingsRepository};
use crate::screen::Services;
use crate::stream::RetryPolicy;
use crate::traits::{ConnectivityMonitor, HttpClient};

/// Build production services: reqwest for HTTP, JSON files under
/// `config.data_dir` for storage.
///
/// Must be called inside a tokio runtime: the connectivity probe is spawned
/// here and lives as long as the returned services.
pub fn build_services(config: &AppConfig) -> AppResult<Services> {
    let http: Arc<dyn HttpClient> =
        Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout)?);
    build_services_with(config, http)
}

/// Like [`build_services`], with an injected HTTP client.
pub fn build_services_with(config: &AppConfig, http: Arc<dyn HttpClient>) -> AppResult<Services> {
    tracing::info!(
        "Using {} with data in {}",
        config.base_url,
        config.data_dir.display()
    );

    let api = RateApiClient::new(http.clone(), &config.base_url)?;
    let rates = RateInteractor::new(Arc::new(RemoteRateRepository::new(api.clone())));

    let favorite_store = JsonFavoriteStore::open_in(&config.data_dir)?;
    let favorites = FavoriteInteractor::new(
        rates.clone(),
        FavoriteRepository::new(Arc::new(favorite_store)),
    );
    let settings = SettingsRepository::new(Arc::new(JsonSettingsStore::open_in(&config.data_dir)?));

    let (connectivity, retry): (Arc<dyn ConnectivityMonitor>, RetryPolicy) = if config.offline {
        tracing::info!("Connectivity probe disabled, assuming online");
        (
            Arc::new(ManualConnectivity::new(true)),
            RetryPolicy::fixed(config.retry_attempts, config.retry_delay),
        )
    } else {
        let monitor: Arc<dyn ConnectivityMonitor> = Arc::new(HttpConnectivityMonitor::spawn(
            http,
            api.base_url().to_string(),
            config.probe_interval,
        ));
        (monitor.clone(), RetryPolicy::when_online(monitor))
    };

    Ok(Services::new(rates, favorites, settings, connectivity)
        .with_retry(retry)
        .with_timing(config.timing()))
}

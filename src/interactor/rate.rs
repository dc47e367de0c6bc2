//! Rate queries, one-shot and live.

use futures::{stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppResult;
use crate::models::{sort_by_symbol_desc, Rate, RateDetail};
use crate::repository::RateRepository;
use crate::stream::{repeat_fetch, LiveStream};

/// Default poll interval of the rate list (3 seconds).
pub const DEFAULT_LIVE_INTERVAL: Duration = Duration::from_millis(3000);

/// Default poll interval of a single rate (3 seconds).
pub const DEFAULT_DETAIL_INTERVAL: Duration = Duration::from_millis(3000);

/// Rate use cases. Lists are always sorted by symbol, descending.
#[derive(Clone)]
pub struct RateInteractor {
    repository: Arc<dyn RateRepository>,
}

impl RateInteractor {
    pub fn new(repository: Arc<dyn RateRepository>) -> Self {
        Self { repository }
    }

    /// Fetch the sorted rate list once.
    pub async fn fetch_rates(&self) -> AppResult<Vec<Rate>> {
        let mut rates = self.repository.rates().await?;
        sort_by_symbol_desc(&mut rates);
        Ok(rates)
    }

    /// Fetch one rate once.
    pub async fn fetch_rate(&self, id: &str) -> AppResult<RateDetail> {
        self.repository.rate(id).await
    }

    /// One-shot stream of the sorted rate list.
    pub fn rates(&self) -> LiveStream<Vec<Rate>> {
        let this = self.clone();
        stream::once(async move { this.fetch_rates().await }).boxed()
    }

    /// The sorted rate list, refetched every `interval`.
    pub fn live_rates(&self, interval: Duration) -> LiveStream<Vec<Rate>> {
        let this = self.clone();
        repeat_fetch(interval, move || {
            let this = this.clone();
            async move { this.fetch_rates().await }
        })
        .boxed()
    }

    /// One rate, refetched every `interval`.
    pub fn live_rate(&self, id: &str, interval: Duration) -> LiveStream<RateDetail> {
        let repository = self.repository.clone();
        let id = id.to_string();
        repeat_fetch(interval, move || {
            let repository = repository.clone();
            let id = id.clone();
            async move {
                tracing::debug!("Polling rate {}", id);
                repository.rate(&id).await
            }
        })
        .boxed()
    }
}

impl std::fmt::Debug for RateInteractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateInteractor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::ScriptedRates;
    use crate::error::NetworkError;
    use rust_decimal::Decimal;

    fn rate(id: &str, symbol: &str) -> Rate {
        Rate {
            id: id.to_string(),
            symbol: symbol.to_string(),
            currency_symbol: None,
            rate_type: "fiat".to_string(),
            rate_usd: Decimal::ONE,
        }
    }

    #[tokio::test]
    async fn test_rates_sorted_desc_and_stable() {
        let scripted = ScriptedRates::new(vec![
            rate("1", "EUR"),
            rate("2", "BTC"),
            rate("3", "USD"),
            rate("4", "EUR"),
        ]);
        let interactor = RateInteractor::new(Arc::new(scripted));

        let rates = interactor.rates().next().await.unwrap().unwrap();
        let ids: Vec<_> = rates.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "4", "2"]);
    }

    #[tokio::test]
    async fn test_rates_is_one_shot() {
        let interactor = RateInteractor::new(Arc::new(ScriptedRates::new(vec![rate("1", "A")])));
        let values: Vec<_> = interactor.rates().collect().await;
        assert_eq!(values.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_rates_sees_updates() {
        let scripted = ScriptedRates::new(vec![rate("1", "A")]);
        let interactor = RateInteractor::new(Arc::new(scripted.clone()));
        let mut live = interactor.live_rates(Duration::from_millis(3000));

        assert_eq!(live.next().await.unwrap().unwrap().len(), 1);
        scripted.set_rates(vec![rate("1", "A"), rate("2", "B")]);
        assert_eq!(live.next().await.unwrap().unwrap().len(), 2);
        assert_eq!(scripted.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_rate_error_passes_through() {
        let scripted = ScriptedRates::new(vec![]);
        let interactor = RateInteractor::new(Arc::new(scripted));

        let values: Vec<_> = interactor
            .live_rate("ghost", DEFAULT_DETAIL_INTERVAL)
            .collect()
            .await;
        assert_eq!(values.len(), 1);
        assert!(matches!(
            values[0],
            Err(crate::error::AppError::Network(NetworkError::HttpStatus {
                status: 404,
                ..
            }))
        ));
    }
}

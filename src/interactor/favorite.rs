//! Favorites joined with live rates.

use std::time::Duration;

use super::rate::RateInteractor;
use crate::error::AppResult;
use crate::models::{FavoriteRecord, Rate};
use crate::repository::FavoriteRepository;
use crate::stream::{combine_latest, LiveStream};

/// Default poll interval of the favorites view (4 seconds).
pub const DEFAULT_FAVORITE_INTERVAL: Duration = Duration::from_millis(4000);

/// True when `rate` has a matching record (same id and symbol).
pub fn is_favorite(rate: &Rate, records: &[FavoriteRecord]) -> bool {
    rate.is_favorite_in(records)
}

fn favorites_only(rates: &[Rate], records: &[FavoriteRecord]) -> Vec<Rate> {
    rates
        .iter()
        .filter(|rate| is_favorite(rate, records))
        .cloned()
        .collect()
}

/// Favorite use cases.
#[derive(Debug, Clone)]
pub struct FavoriteInteractor {
    rates: RateInteractor,
    favorites: FavoriteRepository,
}

impl FavoriteInteractor {
    pub fn new(rates: RateInteractor, favorites: FavoriteRepository) -> Self {
        Self { rates, favorites }
    }

    /// Live favorite rates: polls rates every `interval` and re-filters on
    /// every favorites change.
    pub fn live_favorite_rates(&self, interval: Duration) -> LiveStream<Vec<Rate>> {
        combine_latest(
            self.rates.live_rates(interval),
            self.favorites.watch_records(),
            |rates, records| favorites_only(rates, records),
        )
    }

    /// Favorite rates from a single fetch, re-filtered on every favorites
    /// change.
    pub fn favorite_rates(&self) -> LiveStream<Vec<Rate>> {
        combine_latest(
            self.rates.rates(),
            self.favorites.watch_records(),
            |rates, records| favorites_only(rates, records),
        )
    }

    /// Live favorite rows.
    pub fn favorite_records(&self) -> LiveStream<Vec<FavoriteRecord>> {
        self.favorites.watch_records()
    }

    pub async fn add_favorite(&self, rate: &Rate) -> AppResult<()> {
        self.favorites.add(rate).await
    }

    pub async fn remove_favorite(&self, rate: &Rate) -> AppResult<()> {
        self.favorites.remove(rate).await
    }

    /// Flip `rate`'s favorite state. Returns the new state.
    pub async fn toggle_favorite(&self, rate: &Rate) -> AppResult<bool> {
        let records = self.favorites.records().await?;
        if is_favorite(rate, &records) {
            self.remove_favorite(rate).await?;
            Ok(false)
        } else {
            self.add_favorite(rate).await?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryFavoriteStore, ScriptedRates};
    use futures::StreamExt;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn rate(id: &str, symbol: &str) -> Rate {
        Rate {
            id: id.to_string(),
            symbol: symbol.to_string(),
            currency_symbol: Some(symbol.to_string()),
            rate_type: "fiat".to_string(),
            rate_usd: Decimal::ONE,
        }
    }

    fn interactor(rates: Vec<Rate>, store: &InMemoryFavoriteStore) -> FavoriteInteractor {
        FavoriteInteractor::new(
            RateInteractor::new(Arc::new(ScriptedRates::new(rates))),
            FavoriteRepository::new(Arc::new(store.clone())),
        )
    }

    #[test]
    fn test_is_favorite_needs_id_and_symbol() {
        let records = vec![FavoriteRecord::new("1", "$")];
        assert!(is_favorite(&rate("1", "$"), &records));
        assert!(!is_favorite(&rate("1", "€"), &records));
        assert!(!is_favorite(&rate("2", "$"), &records));
    }

    #[tokio::test]
    async fn test_favorite_rates_filters_by_record() {
        let store = InMemoryFavoriteStore::with_records(vec![FavoriteRecord::new("1", "$")]);
        let interactor = interactor(vec![rate("1", "$"), rate("2", "€")], &store);

        let favorites = interactor.favorite_rates().next().await.unwrap().unwrap();
        assert_eq!(favorites, vec![rate("1", "$")]);
    }

    #[tokio::test]
    async fn test_favorite_rates_follows_store() {
        let store = InMemoryFavoriteStore::new();
        let interactor = interactor(vec![rate("1", "$"), rate("2", "€")], &store);
        let mut live = interactor.favorite_rates();

        assert!(live.next().await.unwrap().unwrap().is_empty());
        interactor.add_favorite(&rate("2", "€")).await.unwrap();
        assert_eq!(live.next().await.unwrap().unwrap(), vec![rate("2", "€")]);
    }

    #[tokio::test]
    async fn test_toggle_flips_once() {
        let store = InMemoryFavoriteStore::new();
        let interactor = interactor(vec![], &store);
        let btc = rate("bitcoin", "BTC");

        assert!(interactor.toggle_favorite(&btc).await.unwrap());
        assert_eq!(store.records(), vec![FavoriteRecord::new("bitcoin", "BTC")]);

        assert!(!interactor.toggle_favorite(&btc).await.unwrap());
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_with_stale_symbol_adds() {
        // A record whose symbol no longer matches does not count as a
        // favorite, so toggling replaces it.
        let store = InMemoryFavoriteStore::with_records(vec![FavoriteRecord::new("1", "old")]);
        let interactor = interactor(vec![], &store);

        assert!(interactor.toggle_favorite(&rate("1", "$")).await.unwrap());
        assert_eq!(store.records(), vec![FavoriteRecord::new("1", "$")]);
    }

    #[tokio::test]
    async fn test_toggle_surfaces_store_failure() {
        let store = InMemoryFavoriteStore::new();
        store.set_write_should_fail(true);
        let interactor = interactor(vec![], &store);

        assert!(interactor.toggle_favorite(&rate("1", "$")).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_favorite_rates() {
        let store = InMemoryFavoriteStore::with_records(vec![FavoriteRecord::new("1", "$")]);
        let interactor = interactor(vec![rate("1", "$"), rate("2", "€")], &store);
        let mut live = interactor.live_favorite_rates(DEFAULT_FAVORITE_INTERVAL);

        assert_eq!(live.next().await.unwrap().unwrap(), vec![rate("1", "$")]);
    }
}

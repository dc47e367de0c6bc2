//! Home: every rate, live, with favorite markers.

use tokio::sync::watch;

use super::services::Services;
use super::state::{run_pipeline, Epoch, JobSlot, ScreenState, StateCell};
use crate::error::AppResult;
use crate::interactor::is_favorite;
use crate::models::{FavoriteRecord, Rate};
use crate::stream::combine_latest;

/// Rates shown on the home screen with the favorite rows they are matched
/// against.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeRates {
    pub rates: Vec<Rate>,
    pub favorites: Vec<FavoriteRecord>,
}

impl HomeRates {
    pub fn is_favorite(&self, rate: &Rate) -> bool {
        is_favorite(rate, &self.favorites)
    }
}

pub struct HomeScreen {
    services: Services,
    state: StateCell<ScreenState<HomeRates>>,
    job: JobSlot,
    epoch: Epoch,
}

impl HomeScreen {
    /// Open the screen and start polling.
    pub fn open(services: Services) -> Self {
        let screen = Self {
            services,
            state: StateCell::new(ScreenState::Loading),
            job: JobSlot::new(),
            epoch: Epoch::new(),
        };
        screen.load();
        screen
    }

    fn load(&self) {
        let rates = self.services.rates.clone();
        let favorites = self.services.favorites.clone();
        let interval = self.services.timing.live_interval;

        let factory = move || {
            combine_latest(
                rates.live_rates(interval),
                favorites.favorite_records(),
                |rates: &Vec<Rate>, records: &Vec<FavoriteRecord>| HomeRates {
                    rates: rates.clone(),
                    favorites: records.clone(),
                },
            )
        };

        self.job.restart(run_pipeline(
            "home",
            factory,
            self.services.retry.clone(),
            ScreenState::Loaded,
            self.state.publisher_for(&self.epoch),
        ));
    }

    /// Restart the pipeline after a `Retrying` state.
    pub fn retry(&self) {
        tracing::info!("home: retry requested");
        self.load();
    }

    /// Flip a rate's favorite state. The new state arrives through the
    /// favorites stream, not from this call.
    pub async fn toggle_favorite(&self, rate: &Rate) -> AppResult<bool> {
        self.services
            .favorites
            .toggle_favorite(rate)
            .await
            .inspect_err(|e| tracing::error!("home: toggling {} failed: {}", rate.id, e))
    }

    pub fn state(&self) -> watch::Receiver<ScreenState<HomeRates>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ScreenState<HomeRates> {
        self.state.get()
    }
}

//! Favorites: only the favorited rates, live.

use tokio::sync::watch;

use super::services::Services;
use super::state::{run_pipeline, Epoch, JobSlot, ScreenState, StateCell};
use crate::error::AppResult;
use crate::models::Rate;

pub struct FavoriteScreen {
    services: Services,
    state: StateCell<ScreenState<Vec<Rate>>>,
    job: JobSlot,
    epoch: Epoch,
}

impl FavoriteScreen {
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
        let favorites = self.services.favorites.clone();
        let interval = self.services.timing.favorite_interval;

        self.job.restart(run_pipeline(
            "favorites",
            move || favorites.live_favorite_rates(interval),
            self.services.retry.clone(),
            |rates: Vec<Rate>| {
                if rates.is_empty() {
                    ScreenState::Empty
                } else {
                    ScreenState::Loaded(rates)
                }
            },
            self.state.publisher_for(&self.epoch),
        ));
    }

    pub fn retry(&self) {
        tracing::info!("favorites: retry requested");
        self.load();
    }

    /// Flip a rate's favorite state; un-favoriting removes it from this
    /// screen on the next emission.
    pub async fn toggle_favorite(&self, rate: &Rate) -> AppResult<bool> {
        self.services
            .favorites
            .toggle_favorite(rate)
            .await
            .inspect_err(|e| tracing::error!("favorites: toggling {} failed: {}", rate.id, e))
    }

    pub fn state(&self) -> watch::Receiver<ScreenState<Vec<Rate>>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ScreenState<Vec<Rate>> {
        self.state.get()
    }
}

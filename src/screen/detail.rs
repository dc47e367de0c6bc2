//! Detail: one rate, live, with its favorite state.

use tokio::sync::watch;

use super::services::Services;
use super::state::{run_pipeline, BottomBar, Epoch, JobSlot, ScreenState, StateCell};
use crate::error::AppResult;
use crate::interactor::is_favorite;
use crate::models::{FavoriteRecord, RateDetail};
use crate::stream::combine_latest;

#[derive(Debug, Clone, PartialEq)]
pub struct RateDetailView {
    pub rate: RateDetail,
    pub is_favorite: bool,
}

pub struct DetailScreen {
    services: Services,
    id: String,
    bottom_bar: BottomBar,
    state: StateCell<ScreenState<RateDetailView>>,
    job: JobSlot,
    epoch: Epoch,
}

impl DetailScreen {
    /// Open the detail of rate `id`. Hides the bottom bar.
    pub fn open(services: Services, id: impl Into<String>, bottom_bar: BottomBar) -> Self {
        bottom_bar.hide();
        let screen = Self {
            services,
            id: id.into(),
            bottom_bar,
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
        let interval = self.services.timing.detail_interval;
        let id = self.id.clone();

        let factory = move || {
            combine_latest(
                rates.live_rate(&id, interval),
                favorites.favorite_records(),
                |rate: &RateDetail, records: &Vec<FavoriteRecord>| RateDetailView {
                    is_favorite: is_favorite(&rate.to_rate(), records),
                    rate: rate.clone(),
                },
            )
        };

        self.job.restart(run_pipeline(
            "detail",
            factory,
            self.services.retry.clone(),
            ScreenState::Loaded,
            self.state.publisher_for(&self.epoch),
        ));
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn retry(&self) {
        tracing::info!("detail {}: retry requested", self.id);
        self.load();
    }

    /// Flip the shown rate's favorite state. `Ok(None)` while nothing is
    /// loaded yet.
    pub async fn toggle_favorite(&self) -> AppResult<Option<bool>> {
        let rate = match self.state.get() {
            ScreenState::Loaded(view) => view.rate.to_rate(),
            _ => return Ok(None),
        };
        self.services
            .favorites
            .toggle_favorite(&rate)
            .await
            .map(Some)
            .inspect_err(|e| tracing::error!("detail {}: toggling failed: {}", self.id, e))
    }

    /// Leave the screen: stop polling and show the bottom bar again.
    pub fn navigate_back(&self) {
        self.job.cancel();
        self.bottom_bar.show();
    }

    pub fn state(&self) -> watch::Receiver<ScreenState<RateDetailView>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ScreenState<RateDetailView> {
        self.state.get()
    }
}

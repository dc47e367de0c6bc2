//! Settings: the theme preference.

use tokio::sync::watch;

use super::services::Services;
use super::state::{run_pipeline, JobSlot, ScreenState, StateCell};
use crate::error::AppResult;
use crate::models::ThemeType;

pub struct SettingScreen {
    services: Services,
    state: StateCell<ScreenState<ThemeType>>,
    job: JobSlot,
}

impl SettingScreen {
    pub fn open(services: Services) -> Self {
        let screen = Self {
            services,
            state: StateCell::new(ScreenState::Loading),
            job: JobSlot::new(),
        };

        let settings = screen.services.settings.clone();
        screen.job.restart(run_pipeline(
            "settings",
            move || settings.theme(),
            screen.services.retry.clone(),
            ScreenState::Loaded,
            screen.state.publisher(),
        ));
        screen
    }

    /// Persist `theme`; the screen state follows through the settings
    /// stream.
    pub async fn change_theme(&self, theme: ThemeType) -> AppResult<()> {
        self.services
            .settings
            .set_theme(theme)
            .await
            .inspect_err(|e| tracing::error!("settings: saving theme failed: {}", e))
    }

    pub fn state(&self) -> watch::Receiver<ScreenState<ThemeType>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ScreenState<ThemeType> {
        self.state.get()
    }
}

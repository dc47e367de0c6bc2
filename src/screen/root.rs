//! Root: connectivity banner, theme, and bottom-bar visibility.

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::services::Services;
use super::state::{BottomBar, JobSlot, StateCell};
use crate::models::ThemeType;
use crate::traits::ConnectivityMonitor;

/// Connectivity banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Banner {
    #[default]
    None,
    Offline,
    /// Shown briefly after connectivity returns.
    Online,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootUiState {
    pub banner: Banner,
    pub theme: ThemeType,
    pub bottom_bar_visible: bool,
}

impl Default for RootUiState {
    fn default() -> Self {
        Self {
            banner: Banner::None,
            theme: ThemeType::System,
            bottom_bar_visible: true,
        }
    }
}

/// App-wide state above the individual screens. Owns the bottom-bar flag
/// and hands out [`BottomBar`] handles to the screens that toggle it.
pub struct RootScreen {
    state: StateCell<RootUiState>,
    bottom_bar: BottomBar,
    banner_job: JobSlot,
    theme_job: JobSlot,
    bottom_bar_job: JobSlot,
}

impl RootScreen {
    pub fn open(services: &Services) -> Self {
        let screen = Self {
            state: StateCell::new(RootUiState::default()),
            bottom_bar: BottomBar::new(),
            banner_job: JobSlot::new(),
            theme_job: JobSlot::new(),
            bottom_bar_job: JobSlot::new(),
        };

        screen.banner_job.restart(follow_connectivity(
            services.connectivity.clone(),
            screen.state.clone(),
            services.timing.online_banner,
        ));

        let mut themes = services.settings.theme();
        let state = screen.state.clone();
        screen.theme_job.restart(async move {
            while let Some(theme) = themes.next().await {
                match theme {
                    Ok(theme) => state.update(|s| s.theme = theme),
                    Err(e) => {
                        tracing::error!("root: theme stream failed: {}", e);
                        break;
                    }
                }
            }
        });

        let mut visible = screen.bottom_bar.subscribe();
        let state = screen.state.clone();
        screen.bottom_bar_job.restart(async move {
            loop {
                let shown = *visible.borrow_and_update();
                state.update(|s| s.bottom_bar_visible = shown);
                if visible.changed().await.is_err() {
                    break;
                }
            }
        });

        screen
    }

    /// Handle for screens that hide or show the bottom bar.
    pub fn bottom_bar(&self) -> BottomBar {
        self.bottom_bar.clone()
    }

    pub fn state(&self) -> watch::Receiver<RootUiState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> RootUiState {
        self.state.get()
    }
}

/// Offline shows `Offline`; returning online shows `Online` for
/// `online_for`, then clears. Being online at launch shows nothing.
async fn follow_connectivity(
    monitor: Arc<dyn ConnectivityMonitor>,
    state: StateCell<RootUiState>,
    online_for: Duration,
) {
    let mut online = monitor.is_online();
    let mut last: Option<bool> = None;

    loop {
        let now = *online.borrow_and_update();
        if last != Some(now) {
            let banner = match (now, last) {
                (false, _) => Banner::Offline,
                (true, None) => Banner::None,
                (true, Some(_)) => Banner::Online,
            };
            tracing::info!("root: {}", if now { "online" } else { "offline" });
            state.update(|s| s.banner = banner);
            last = Some(now);

            if banner == Banner::Online {
                tokio::select! {
                    changed = online.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        continue;
                    }
                    _ = tokio::time::sleep(online_for) => {
                        state.update(|s| {
                            if s.banner == Banner::Online {
                                s.banner = Banner::None;
                            }
                        });
                    }
                }
            }
        }

        if online.changed().await.is_err() {
            break;
        }
    }
}

//! Per-screen state machines.
//!
//! Each screen owns one [`StateCell`] and the tasks that feed it. Dropping
//! a screen aborts those tasks, which cancels any in-flight fetch, poll
//! wait or retry wait.
//!
//! | Screen | State | Source |
//! |--------|-------|--------|
//! | [`HomeScreen`] | `ScreenState<HomeRates>` | live rates x favorites |
//! | [`FavoriteScreen`] | `ScreenState<Vec<Rate>>` | live favorite rates |
//! | [`DetailScreen`] | `ScreenState<RateDetailView>` | live rate x favorites |
//! | [`SearchScreen`] | `SearchUiState` | debounced query -> rates x favorites |
//! | [`SettingScreen`] | `ScreenState<ThemeType>` | settings stream |
//! | [`RootScreen`] | `RootUiState` | connectivity, theme, bottom bar |

pub mod detail;
pub mod favorite;
pub mod home;
pub mod root;
pub mod search;
pub mod services;
pub mod setting;
pub mod state;

pub use detail::{DetailScreen, RateDetailView};
pub use favorite::FavoriteScreen;
pub use home::{HomeRates, HomeScreen};
pub use root::{Banner, RootScreen, RootUiState};
pub use search::{SearchPhase, SearchResults, SearchScreen, SearchUiState};
pub use services::{ScreenTiming, Services};
pub use setting::SettingScreen;
pub use state::{
    run_pipeline, BottomBar, Epoch, JobSlot, Publish, ScreenJob, ScreenState, StateCell,
};

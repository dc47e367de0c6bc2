//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`JsonFavoriteStore`] - favorites in `<data_dir>/favorites.json`
//! - [`JsonSettingsStore`] - settings in `<data_dir>/settings.json`
//! - [`HttpConnectivityMonitor`] - online flag from a periodic HTTP probe
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for all adapters.

pub mod http_connectivity;
pub mod json_favorites;
mod json_file;
pub mod json_settings;
pub mod mock;
pub mod reqwest_http;

pub use http_connectivity::HttpConnectivityMonitor;
pub use json_favorites::JsonFavoriteStore;
pub use json_settings::JsonSettingsStore;
pub use mock::{
    InMemoryFavoriteStore, InMemorySettingsStore, ManualConnectivity, MockHttpClient,
    MockResponse, ScriptedRates,
};
pub use reqwest_http::ReqwestHttpClient;

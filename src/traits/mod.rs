//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP GET used by the rate API client and the probe
//! - [`FavoriteStore`] - persisted favorite rows with a live query
//! - [`SettingsStore`] - persisted key-value settings with a live query
//! - [`ConnectivityMonitor`] - live online/offline flag

pub mod connectivity;
pub mod favorites;
pub mod http;
pub mod settings;

pub use connectivity::ConnectivityMonitor;
pub use favorites::FavoriteStore;
pub use http::{Headers, HttpClient, Response};
pub use settings::SettingsStore;

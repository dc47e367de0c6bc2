//! Mock implementations for testing.
//!
//! This module provides in-memory implementations of all trait abstractions,
//! enabling unit testing without network access or file system access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with fixed and queued responses
//! - [`InMemoryFavoriteStore`] - favorites with failure injection
//! - [`InMemorySettingsStore`] - settings held in a watch channel
//! - [`ManualConnectivity`] - connectivity flag flipped by the test
//! - [`ScriptedRates`] - rate table with injectable failures

pub mod connectivity;
pub mod favorites;
pub mod http;
pub mod rates;
pub mod settings;

pub use connectivity::ManualConnectivity;
pub use favorites::InMemoryFavoriteStore;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use rates::ScriptedRates;
pub use settings::InMemorySettingsStore;

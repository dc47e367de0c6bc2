//! REST client for the CoinCap-style `/rates` API.
//!
//! - [`RateApiClient`] - typed GET requests over [`crate::traits::HttpClient`]
//! - [`wire`] - response envelopes exactly as the server sends them

pub mod client;
pub mod wire;

pub use client::{RateApiClient, DEFAULT_BASE_URL};
pub use wire::{RateDto, RateEnvelope, RatesEnvelope};

//! ratewatch - live exchange rates with favorites, search and offline recovery
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod error;
pub mod interactor;
pub mod models;
pub mod repository;
pub mod screen;
pub mod startup;
pub mod stream;
pub mod traits;

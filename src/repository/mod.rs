//! Repositories translate between collaborators and domain types.
//!
//! - [`RateRepository`] / [`RemoteRateRepository`] - rates from the REST API
//! - [`FavoriteRepository`] - favorite rows keyed by rate
//! - [`SettingsRepository`] - typed theme preference

pub mod favorite;
pub mod rate;
pub mod settings;

pub use favorite::FavoriteRepository;
pub use rate::{RateRepository, RemoteRateRepository};
pub use settings::SettingsRepository;

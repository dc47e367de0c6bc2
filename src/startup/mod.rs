//! Startup: configuration and wiring.
//!
//! - [`config`] - [`AppConfig`] with builder methods and `from_env`
//! - [`wiring`] - turns a config into [`crate::screen::Services`]
//!
//! ```ignore
//! use ratewatch::startup::{build_services, AppConfig};
//!
//! let config = AppConfig::from_env()?;
//! let services = build_services(&config)?;
//! ```

pub mod config;
pub mod wiring;

pub use config::AppConfig;
pub use wiring::{build_services, build_services_with};

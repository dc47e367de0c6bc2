//! Use-case layer: the streams screens subscribe to.

pub mod favorite;
pub mod rate;

pub use favorite::{is_favorite, FavoriteInteractor, DEFAULT_FAVORITE_INTERVAL};
pub use rate::{RateInteractor, DEFAULT_DETAIL_INTERVAL, DEFAULT_LIVE_INTERVAL};

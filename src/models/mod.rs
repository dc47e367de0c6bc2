//! Domain models shared by the repositories, interactors and screens.

mod favorite;
mod rate;
mod theme;

pub use favorite::FavoriteRecord;
pub use rate::{sort_by_symbol_desc, Rate, RateDetail};
pub use theme::ThemeType;

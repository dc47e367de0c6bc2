use serde::{Deserialize, Serialize};

use super::Rate;

/// A persisted favorite, keyed by rate id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: String,
    pub symbol: String,
}

impl FavoriteRecord {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
        }
    }
}

impl From<&Rate> for FavoriteRecord {
    fn from(rate: &Rate) -> Self {
        Self::new(rate.id.clone(), rate.symbol.clone())
    }
}

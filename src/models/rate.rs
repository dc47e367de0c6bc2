use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FavoriteRecord;

/// A currency or crypto asset priced in USD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub id: String,
    /// Ticker-like display symbol ("BTC", "EUR")
    pub symbol: String,
    /// Glyph for fiat currencies ("$", "€"); absent for most crypto assets
    pub currency_symbol: Option<String>,
    /// "fiat" or "crypto"
    pub rate_type: String,
    pub rate_usd: Decimal,
}

impl Rate {
    /// True when `record` refers to this rate. Both id and symbol must match.
    pub fn matches(&self, record: &FavoriteRecord) -> bool {
        self.id == record.id && self.symbol == record.symbol
    }

    /// True when any of `records` refers to this rate.
    pub fn is_favorite_in(&self, records: &[FavoriteRecord]) -> bool {
        records.iter().any(|record| self.matches(record))
    }
}

/// A single rate as returned by the detail endpoint, stamped with the
/// server time of the quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateDetail {
    pub id: String,
    pub symbol: String,
    pub currency_symbol: Option<String>,
    pub rate_type: String,
    pub rate_usd: Decimal,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl RateDetail {
    /// Drop the timestamp, e.g. to favorite the rate shown on a detail view.
    pub fn to_rate(&self) -> Rate {
        Rate {
            id: self.id.clone(),
            symbol: self.symbol.clone(),
            currency_symbol: self.currency_symbol.clone(),
            rate_type: self.rate_type.clone(),
            rate_usd: self.rate_usd,
        }
    }

    pub fn quoted_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Sort rates by symbol, descending. Stable: rates sharing a symbol keep
/// their source order.
pub fn sort_by_symbol_desc(rates: &mut [Rate]) {
    rates.sort_by(|a, b| b.symbol.cmp(&a.symbol));
}

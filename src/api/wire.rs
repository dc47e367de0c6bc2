//! Wire types for the rates API.
//!
//! ```json
//! { "data": [ { "id": "bitcoin", "symbol": "BTC", "currencySymbol": "₿",
//!               "type": "crypto", "rateUsd": "67123.4512" } ],
//!   "timestamp": 1718000000000 }
//! ```
//!
//! Numeric fields arrive as strings on some deployments and as JSON numbers
//! on others; both are accepted.

use serde::{Deserialize, Deserializer};

/// One rate row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateDto {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub currency_symbol: Option<String>,
    #[serde(rename = "type")]
    pub rate_type: String,
    /// Decimal USD price, kept as text so no precision is lost before
    /// it is parsed into a `Decimal`.
    #[serde(deserialize_with = "deserialize_number_text")]
    pub rate_usd: String,
}

/// Envelope of `GET /rates`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatesEnvelope {
    pub data: Vec<RateDto>,
    #[serde(default, deserialize_with = "deserialize_opt_timestamp")]
    pub timestamp: Option<i64>,
}

/// Envelope of `GET /rates/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateEnvelope {
    pub data: RateDto,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: i64,
}

/// Deserialize a number that may be sent as a JSON number or a string,
/// keeping its textual form.
fn deserialize_number_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct NumberTextVisitor;

    impl<'de> Visitor<'de> for NumberTextVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or numeric string")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.trim().to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.trim().to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(NumberTextVisitor)
}

/// Deserialize an epoch-millisecond timestamp sent as a number or a string.
/// Fractional values are truncated.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("epoch milliseconds as a number or string")
        }

        fn visit_i64<E>(self, value: i64) -> Result<i64, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<i64, E>
        where
            E: de::Error,
        {
            i64::try_from(value).map_err(|_| E::custom(format!("timestamp out of range: {}", value)))
        }

        fn visit_f64<E>(self, value: f64) -> Result<i64, E>
        where
            E: de::Error,
        {
            truncate_millis(value)
        }

        fn visit_str<E>(self, value: &str) -> Result<i64, E>
        where
            E: de::Error,
        {
            let value = value.trim();
            if let Ok(millis) = value.parse::<i64>() {
                return Ok(millis);
            }
            match value.parse::<f64>() {
                Ok(v) => truncate_millis(v),
                Err(_) => Err(E::invalid_value(de::Unexpected::Str(value), &self)),
            }
        }
    }

    fn truncate_millis<E: de::Error>(value: f64) -> Result<i64, E> {
        if value.is_finite() {
            Ok(value.trunc() as i64)
        } else {
            Err(E::custom("timestamp is not finite"))
        }
    }

    deserializer.deserialize_any(TimestampVisitor)
}

fn deserialize_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_timestamp(deserializer).map(Some)
}

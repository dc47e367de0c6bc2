//! Rate source.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::api::{RateApiClient, RateDto};
use crate::error::{AppResult, NetworkError};
use crate::models::{Rate, RateDetail};

/// Source of exchange rates.
#[async_trait]
pub trait RateRepository: Send + Sync {
    /// Every rate, in source order.
    async fn rates(&self) -> AppResult<Vec<Rate>>;

    /// One rate with its quote timestamp.
    async fn rate(&self, id: &str) -> AppResult<RateDetail>;
}

/// [`RateRepository`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct RemoteRateRepository {
    api: RateApiClient,
}

impl RemoteRateRepository {
    pub fn new(api: RateApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RateRepository for RemoteRateRepository {
    async fn rates(&self) -> AppResult<Vec<Rate>> {
        let rows = self.api.fetch_rates().await?;
        let rates = rows.iter().map(to_rate).collect::<Result<Vec<_>, _>>()?;
        Ok(rates)
    }

    async fn rate(&self, id: &str) -> AppResult<RateDetail> {
        let envelope = self.api.fetch_rate(id).await?;
        let rate = to_rate(&envelope.data)?;
        Ok(RateDetail {
            id: rate.id,
            symbol: rate.symbol,
            currency_symbol: rate.currency_symbol,
            rate_type: rate.rate_type,
            rate_usd: rate.rate_usd,
            timestamp: envelope.timestamp,
        })
    }
}

fn to_rate(dto: &RateDto) -> Result<Rate, NetworkError> {
    Ok(Rate {
        id: dto.id.clone(),
        symbol: dto.symbol.clone(),
        currency_symbol: dto.currency_symbol.clone(),
        rate_type: dto.rate_type.clone(),
        rate_usd: parse_decimal(&dto.rate_usd).map_err(|message| {
            NetworkError::InvalidResponse {
                message: format!("rate '{}': {}", dto.id, message),
            }
        })?,
    })
}

/// Parse plain or scientific decimal text ("0.000012", "1.2e-5").
fn parse_decimal(text: &str) -> Result<Decimal, String> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| format!("'{}' is not a decimal: {}", text, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::error::AppError;
    use std::sync::Arc;

    fn repository(http: &MockHttpClient) -> RemoteRateRepository {
        let api = RateApiClient::new(Arc::new(http.clone()), "http://api.test").unwrap();
        RemoteRateRepository::new(api)
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1.08").unwrap(), Decimal::from_str("1.08").unwrap());
        assert_eq!(
            parse_decimal("1.2e-5").unwrap(),
            Decimal::from_str("0.000012").unwrap()
        );
        assert!(parse_decimal("lots").is_err());
    }

    #[tokio::test]
    async fn test_rates_keep_source_order() {
        let http = MockHttpClient::new();
        http.set_response(
            "http://api.test/rates",
            MockResponse::json(
                r#"{"data":[
                    {"id":"euro","symbol":"EUR","currencySymbol":"€","type":"fiat","rateUsd":"1.08"},
                    {"id":"bitcoin","symbol":"BTC","currencySymbol":"₿","type":"crypto","rateUsd":"67000.5"}
                ]}"#,
            ),
        );

        let rates = repository(&http).rates().await.unwrap();
        let ids: Vec<_> = rates.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["euro", "bitcoin"]);
        assert_eq!(rates[1].rate_usd, Decimal::from_str("67000.5").unwrap());
    }

    #[tokio::test]
    async fn test_rate_detail() {
        let http = MockHttpClient::new();
        http.set_response(
            "http://api.test/rates/euro",
            MockResponse::json(
                r#"{"data":{"id":"euro","symbol":"EUR","currencySymbol":"€","type":"fiat","rateUsd":"1.08"},"timestamp":"1718000000000"}"#,
            ),
        );

        let detail = repository(&http).rate("euro").await.unwrap();
        assert_eq!(detail.symbol, "EUR");
        assert_eq!(detail.timestamp, 1_718_000_000_000);
    }

    #[tokio::test]
    async fn test_bad_decimal_is_invalid_response() {
        let http = MockHttpClient::new();
        http.set_response(
            "http://api.test/rates",
            MockResponse::json(
                r#"{"data":[{"id":"x","symbol":"X","type":"crypto","rateUsd":"n/a"}]}"#,
            ),
        );

        let err = repository(&http).rates().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Network(NetworkError::InvalidResponse { .. })
        ));
        assert!(err.is_transient());
    }
}

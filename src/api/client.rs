//! Typed client for the rates endpoints.

use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::wire::{RateDto, RateEnvelope, RatesEnvelope};
use crate::error::{classify_status, AppError, AppResult, NetworkError};
use crate::traits::{Headers, HttpClient};

/// Public CoinCap endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.coincap.io/v2";

/// Longest error body echoed into an error message.
const MAX_ERROR_BODY: usize = 200;

/// Client for `GET {base}/rates` and `GET {base}/rates/{id}`.
#[derive(Clone)]
pub struct RateApiClient {
    http: Arc<dyn HttpClient>,
    base_url: reqwest::Url,
}

impl RateApiClient {
    /// Create a client rooted at `base_url`.
    ///
    /// Fails with a configuration error when `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(http: Arc<dyn HttpClient>, base_url: &str) -> AppResult<Self> {
        let invalid = |message: String| AppError::Configuration {
            variable: "base_url".to_string(),
            message,
        };

        let base_url = reqwest::Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| invalid(format!("'{}' is not a valid URL: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!("'{}' is not an http(s) base URL", base_url)));
        }

        Ok(Self { http, base_url })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// URL of the rate list.
    pub fn rates_url(&self) -> String {
        self.endpoint(&["rates"])
    }

    /// URL of a single rate. `id` is percent-encoded as a path segment.
    pub fn rate_url(&self, id: &str) -> String {
        self.endpoint(&["rates", id])
    }

    /// Fetch every rate.
    pub async fn fetch_rates(&self) -> Result<Vec<RateDto>, NetworkError> {
        let envelope: RatesEnvelope = self.get_json(&self.rates_url()).await?;
        tracing::debug!("Fetched {} rates", envelope.data.len());
        Ok(envelope.data)
    }

    /// Fetch one rate with its quote timestamp.
    pub async fn fetch_rate(&self, id: &str) -> Result<RateEnvelope, NetworkError> {
        self.get_json(&self.rate_url(id)).await
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, NetworkError> {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        let response = self.http.get(url, &headers).await?;

        if !response.is_success() {
            let body = response.text_lossy();
            let message = if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                format!("{}...", &body[..cut])
            } else {
                body
            };
            tracing::warn!("GET {} returned {}", url, response.status);
            return Err(classify_status(response.status, message));
        }

        response.json().map_err(|e| NetworkError::InvalidResponse {
            message: format!("Unexpected payload from {}: {}", url, e),
        })
    }
}

impl std::fmt::Debug for RateApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::Response;

    fn client(http: &MockHttpClient) -> RateApiClient {
        RateApiClient::new(Arc::new(http.clone()), "http://api.test/v2/").unwrap()
    }

    #[test]
    fn test_urls() {
        let api = client(&MockHttpClient::new());
        assert_eq!(api.rates_url(), "http://api.test/v2/rates");
        assert_eq!(api.rate_url("bitcoin"), "http://api.test/v2/rates/bitcoin");
        assert_eq!(api.rate_url("a b/c"), "http://api.test/v2/rates/a%20b%2Fc");
    }

    #[test]
    fn test_invalid_base_url() {
        let http: Arc<dyn HttpClient> = Arc::new(MockHttpClient::new());
        assert!(matches!(
            RateApiClient::new(http.clone(), "not a url"),
            Err(AppError::Configuration { .. })
        ));
        assert!(RateApiClient::new(http, "mailto:rates@example.com").is_err());
    }

    #[tokio::test]
    async fn test_fetch_rates() {
        let http = MockHttpClient::new();
        http.set_response(
            "http://api.test/v2/rates",
            MockResponse::json(
                r#"{"data":[{"id":"euro","symbol":"EUR","currencySymbol":"€","type":"fiat","rateUsd":"1.08"}],"timestamp":1}"#,
            ),
        );

        let rates = client(&http).fetch_rates().await.unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].id, "euro");

        let requests = http.get_requests();
        assert_eq!(
            requests[0].headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_status_errors() {
        let http = MockHttpClient::new();
        http.set_response(
            "http://api.test/v2/rates/nope",
            MockResponse::Success(Response::new(404, "not found")),
        );
        http.set_response(
            "http://api.test/v2/rates",
            MockResponse::Success(Response::new(429, "slow down")),
        );

        let api = client(&http);
        assert!(matches!(
            api.fetch_rate("nope").await,
            Err(NetworkError::HttpStatus { status: 404, .. })
        ));
        assert!(matches!(
            api.fetch_rates().await,
            Err(NetworkError::RateLimited { .. })
        ));
    }

    #[tokio::test]
    async fn test_bad_payload_is_invalid_response() {
        let http = MockHttpClient::new();
        http.set_response("http://api.test/v2/rates", MockResponse::json("{\"data\": 5}"));

        assert!(matches!(
            client(&http).fetch_rates().await,
            Err(NetworkError::InvalidResponse { .. })
        ));
    }
}

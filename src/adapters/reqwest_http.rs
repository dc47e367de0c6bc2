//! Reqwest-based HTTP client adapter.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{classify_reqwest_error, NetworkError};
use crate::traits::{Headers, HttpClient, Response};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("ratewatch/", env!("CARGO_PKG_VERSION"));

/// [`HttpClient`] over a shared `reqwest::Client`.
///
/// Cloning is cheap; clones share the connection pool.
///
/// ```ignore
/// let http = ReqwestHttpClient::with_timeout(Duration::from_secs(15))?;
/// let response = http.get("https://api.coincap.io/v2/rates", &Headers::new()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// A client without request timeouts.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// A client whose connects and whole requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| NetworkError::Other {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_headers(map: &reqwest::header::HeaderMap) -> Headers {
    // Non-UTF-8 header values are dropped
    map.iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect()
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, NetworkError> {
        let request = headers
            .iter()
            .fold(self.client.get(url), |request, (name, value)| {
                request.header(name, value)
            });

        let response = request
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, url))?;
        let status = response.status().as_u16();
        let response_headers = collect_headers(response.headers());
        tracing::trace!("GET {} -> {}", url, status);

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(&e, url))?;
        Ok(Response::with_headers(status, response_headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_headers_lowercases_names() {
        let mut map = reqwest::header::HeaderMap::new();
        map.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );

        let headers = collect_headers(&map);
        assert_eq!(
            headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("ratewatch/"));
        assert!(ReqwestHttpClient::with_timeout(Duration::from_secs(15)).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        let result = ReqwestHttpClient::new()
            .get("not-a-valid-url", &Headers::new())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_refused_connection_fails() {
        let result = ReqwestHttpClient::new()
            .get("http://127.0.0.1:59999/rates", &Headers::new())
            .await;
        match result {
            Err(e) => assert!(matches!(
                e,
                NetworkError::ConnectionFailed { .. } | NetworkError::Other { .. }
            )),
            Ok(_) => panic!("expected a connection error"),
        }
    }
}

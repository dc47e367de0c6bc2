//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses or errors, either fixed per URL or queued one-shot.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::error::NetworkError;
use crate::traits::{Headers, HttpClient, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful response
    Success(Response),
    /// Return an error
    Error(NetworkError),
}

impl MockResponse {
    /// A 200 response with a JSON body.
    pub fn json(body: impl Into<String>) -> Self {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let body: String = body.into();
        MockResponse::Success(Response::with_headers(200, headers, Bytes::from(body)))
    }

    /// A connection failure for `url`.
    pub fn connection_failed(url: &str) -> Self {
        MockResponse::Error(NetworkError::ConnectionFailed {
            url: url.to_string(),
            message: "mock connection failure".to_string(),
        })
    }
}

/// Mock HTTP client for testing.
///
/// Lookup order for a request:
/// 1. the next queued response for the exact URL (consumed),
/// 2. the fixed response for the exact URL,
/// 3. the fixed response for the longest matching URL prefix,
/// 4. the default response.
///
/// # Example
///
/// ```ignore
/// use ratewatch::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response("https://api.test/rates", MockResponse::json(r#"{"data":[]}"#));
/// client.push_response("https://api.test/rates", MockResponse::connection_failed("https://api.test/rates"));
///
/// // First call fails, every later call returns the fixed body.
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Fixed responses by URL or URL prefix
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// One-shot responses by exact URL
    queued: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    /// Default response when nothing matches
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            queued: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the fixed response for a URL (also used as a prefix pattern).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Queue a one-shot response for an exact URL.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        self.queued
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests made to an exact URL.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    fn record_request(&self, url: &str, headers: &Headers) {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(queue) = self.queued.lock().unwrap().get_mut(url) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        let prefix_match = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, response)| response.clone());
        if prefix_match.is_some() {
            return prefix_match;
        }

        self.default_response.lock().unwrap().clone()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, NetworkError> {
        self.record_request(url, headers);

        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(NetworkError::Other {
                message: format!("No mock response for URL: {}", url),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_response() {
        let client = MockHttpClient::new();
        client.set_response("http://api.test/rates", MockResponse::json("[]"));

        let response = client
            .get("http://api.test/rates", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text_lossy(), "[]");
        assert_eq!(client.request_count("http://api.test/rates"), 1);
    }

    #[tokio::test]
    async fn test_queued_responses_come_first() {
        let client = MockHttpClient::new();
        let url = "http://api.test/rates";
        client.set_response(url, MockResponse::json("fixed"));
        client.push_response(url, MockResponse::connection_failed(url));

        assert!(client.get(url, &Headers::new()).await.is_err());
        let response = client.get(url, &Headers::new()).await.unwrap();
        assert_eq!(response.text_lossy(), "fixed");
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let client = MockHttpClient::new();
        client.set_response("http://api.test/", MockResponse::json("root"));
        client.set_response("http://api.test/rates/", MockResponse::json("detail"));

        let response = client
            .get("http://api.test/rates/bitcoin", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.text_lossy(), "detail");
    }

    #[tokio::test]
    async fn test_no_match_is_error() {
        let client = MockHttpClient::new();
        let result = client.get("http://nowhere.test", &Headers::new()).await;
        assert!(matches!(result, Err(NetworkError::Other { .. })));
    }
}

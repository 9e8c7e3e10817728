//! HTTP client abstraction for making requests.
//!
//! This module defines the `HttpClient` trait to abstract HTTP request execution,
//! enabling testability with mock implementations.

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

/// An outgoing HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (e.g., "POST", "GET")
    pub method: String,
    /// Base URL of the API, including the trailing slash (e.g., "https://api.engagespot.co/v3/")
    pub endpoint: String,
    /// Path relative to the endpoint (e.g., "notifications")
    pub path: String,
    pub headers: HeaderMap,
    /// The request body as a JSON string
    pub body: String,
}

impl HttpRequest {
    /// Get the full URL for this request.
    pub fn url(&self) -> String {
        format!("{}{}", self.endpoint, self.path)
    }
}

/// Response from an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as a string
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Trait for executing HTTP requests.
///
/// This abstraction allows for different implementations (production vs. testing)
/// and makes the client logic testable without making real HTTP calls.
///
/// Implementations return `Ok` for every response the server produced, whatever
/// its status. Status interpretation belongs to the caller.
#[async_trait]
pub trait HttpClient: Send + Sync + Clone {
    /// Execute an HTTP request.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The request fails due to network issues
    /// - The method or URL is invalid
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Production HTTP client using reqwest.
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new reqwest-based HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing reqwest client (e.g. one with a proxy or custom TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url();

        tracing::debug!(url = %url, "Executing HTTP request");

        let method = request.method.parse::<reqwest::Method>().map_err(|e| {
            tracing::error!(method = %request.method, error = %e, "Invalid HTTP method");
            anyhow::anyhow!("Invalid HTTP method '{}': {}", request.method, e)
        })?;

        let mut req = self.client.request(method, &url).headers(request.headers.clone());

        if !request.body.is_empty() {
            req = req
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(request.body.clone());
            tracing::trace!(body_len = request.body.len(), "Added request body");
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "HTTP request failed");
            e
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::info!(status = status, response_len = body.len(), "HTTP request completed");

        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Mock HTTP client for testing.
///
/// Allows configuring predetermined responses for specific requests without
/// making actual HTTP calls.
///
/// # Example
/// ```ignore
/// let mock = MockHttpClient::new();
/// mock.add_response(
///     "POST notifications",
///     Ok(HttpResponse {
///         status: 200,
///         body: r#"{"id": 1}"#.to_string(),
///     }),
/// );
/// ```
#[derive(Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, Vec<Result<HttpResponse>>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

/// Record of a call made to the mock HTTP client.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub method: String,
    pub endpoint: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl MockCall {
    /// Look up a header value recorded for this call.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parse the recorded body as JSON.
    pub fn json_body(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predetermined response for a specific method and path.
    ///
    /// The key is formatted as "{method} {path}". Multiple responses can be
    /// added for the same key - they will be returned in FIFO order.
    pub fn add_response(&self, key: &str, response: Result<HttpResponse>) {
        self.responses.lock().entry(key.to_string()).or_default().push(response);
    }

    /// Shorthand for a response with the given status and body.
    pub fn respond_with(&self, key: &str, status: u16, body: &str) {
        self.add_response(
            key,
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    /// Get all calls that have been made to this mock client.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Clear all recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        // Record this call
        self.calls.lock().push(MockCall {
            method: request.method.clone(),
            endpoint: request.endpoint.clone(),
            path: request.path.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });

        // Look up the response
        let key = format!("{} {}", request.method, request.path);
        let mut responses = self.responses.lock();

        if let Some(response_queue) = responses.get_mut(&key) {
            if !response_queue.is_empty() {
                return response_queue.remove(0);
            }
        }

        // No response configured - return a default error
        Err(Error::Other(anyhow::anyhow!(
            "No mock response configured for {} {}",
            request.method,
            request.path
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, path: &str) -> HttpRequest {
        HttpRequest {
            method: method.to_string(),
            endpoint: "https://api.example.com/v3/".to_string(),
            path: path.to_string(),
            headers: HeaderMap::new(),
            body: "{}".to_string(),
        }
    }

    #[test]
    fn test_url_joins_endpoint_and_path() {
        assert_eq!(request("POST", "sdk/connect").url(), "https://api.example.com/v3/sdk/connect");
    }

    #[test]
    fn test_response_helpers() {
        let ok = HttpResponse {
            status: 201,
            body: r#"{"id": 7}"#.to_string(),
        };
        assert!(ok.is_success());
        let value: serde_json::Value = ok.json().unwrap();
        assert_eq!(value["id"], 7);

        let redirect = HttpResponse {
            status: 302,
            body: String::new(),
        };
        assert!(!redirect.is_success());
        assert!(redirect.json::<serde_json::Value>().is_err());
    }

    #[tokio::test]
    async fn test_mock_client_basic() {
        let mock = MockHttpClient::new();
        mock.respond_with("POST notifications", 200, "success");

        let mut req = request("POST", "notifications");
        req.headers.insert("X-TEST", HeaderValue::from_static("value"));

        let response = mock.execute(&req).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "success");

        // Verify call was recorded
        let calls = mock.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, "notifications");
        assert_eq!(calls[0].header("x-test"), Some("value"));
        assert_eq!(calls[0].json_body().unwrap(), serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_mock_client_multiple_responses() {
        let mock = MockHttpClient::new();
        mock.respond_with("POST sdk/connect", 200, "first");
        mock.respond_with("POST sdk/connect", 200, "second");

        let req = request("POST", "sdk/connect");
        assert_eq!(mock.execute(&req).await.unwrap().body, "first");
        assert_eq!(mock.execute(&req).await.unwrap().body, "second");
        assert_eq!(mock.call_count(), 2);

        mock.clear_calls();
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_client_no_response() {
        let mock = MockHttpClient::new();

        let result = mock.execute(&request("POST", "unknown")).await;
        assert!(matches!(result, Err(Error::Other(_))));
        assert_eq!(mock.call_count(), 1);
    }
}

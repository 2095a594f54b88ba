//! HTTP backend abstraction for the synthesis endpoint.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use url::Url;

use crate::error::HttpResult;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Status and body of an endpoint response.
///
/// Non-success statuses are returned as values, not errors; deciding what a
/// status means is the client's job.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body (audio bytes on success).
    pub body: Bytes,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Trait for HTTP backends that can POST JSON and return raw bytes.
///
/// This abstraction allows for dependency injection of HTTP clients,
/// making it easy to test code that depends on HTTP requests.
///
/// This is an implementation detail - external code should use the
/// `SynthesisPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST a JSON body to a URL and return the raw response.
    async fn post_json(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> HttpResult<HttpResponse>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given request timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }
}

impl Default for ReqwestBackend {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> HttpResult<HttpResponse> {
        let mut request = self.client.post(url.as_str()).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::FakeBackend;
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        let ok = HttpResponse {
            status: 200,
            body: Bytes::new(),
        };
        let created = HttpResponse {
            status: 201,
            body: Bytes::new(),
        };
        let redirect = HttpResponse {
            status: 302,
            body: Bytes::new(),
        };
        let client_err = HttpResponse {
            status: 404,
            body: Bytes::new(),
        };

        assert!(ok.is_success());
        assert!(created.is_success());
        assert!(!redirect.is_success());
        assert!(!client_err.is_success());
    }

    #[tokio::test]
    async fn fake_backend_records_requests() {
        let backend = FakeBackend::respond_with(200, b"audio");
        let url = Url::parse("http://localhost:4000/tts/generate").unwrap();

        let response = backend
            .post_json(&url, &[("x-csrf-token", "tok")], &json!({"text": "hi"}))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(&response.body[..], b"audio");

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, url);
        assert_eq!(requests[0].body["text"], "hi");
        assert_eq!(
            requests[0].headers,
            vec![("x-csrf-token".to_owned(), "tok".to_owned())]
        );
    }
}

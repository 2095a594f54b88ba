//! The synthesis gateway client.
//!
//! Implements [`SynthesisPort`] over an [`HttpBackend`]: the trigger's text
//! payload goes out as JSON, audio bytes come back. Cancellation is raced
//! against the in-flight request with `tokio::select!`, so an abandoned
//! request resolves as [`SpeechError::Cancelled`] without waiting for the
//! endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use livevox_core::{SpeechError, SynthesisPort};

use crate::error::{HttpError, HttpResult};
use crate::http::HttpBackend;

/// Path of the synthesis endpoint, relative to the page origin.
pub const SYNTHESIS_PATH: &str = "/tts/generate";

/// Header carrying the anti-forgery token on synthesis requests.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Configuration for the synthesis client.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Full URL of the synthesis endpoint.
    pub endpoint: Url,

    /// Anti-forgery token sent with every request, if the page has one.
    pub csrf_token: Option<String>,
}

impl SynthesisConfig {
    /// Configuration for the standard endpoint under `origin`.
    pub fn for_origin(origin: &Url) -> HttpResult<Self> {
        Ok(Self {
            endpoint: origin.join(SYNTHESIS_PATH)?,
            csrf_token: None,
        })
    }

    /// Attach an anti-forgery token.
    #[must_use]
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }
}

/// JSON body of a synthesis request.
#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
}

/// [`SynthesisPort`] adapter over an [`HttpBackend`].
pub struct SynthesisClient {
    backend: Arc<dyn HttpBackend>,
    config: SynthesisConfig,
}

impl SynthesisClient {
    /// Create a client over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn HttpBackend>, config: SynthesisConfig) -> Self {
        Self { backend, config }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        self.config
            .csrf_token
            .as_deref()
            .map(|token| (CSRF_HEADER, token))
            .into_iter()
            .collect()
    }
}

#[async_trait]
impl SynthesisPort for SynthesisClient {
    async fn synthesize(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Bytes, SpeechError> {
        // A session torn down before its task ran never hits the network.
        if cancel.is_cancelled() {
            return Err(SpeechError::Cancelled);
        }

        let body = serde_json::to_value(SynthesisRequest { text })
            .map_err(|e| SpeechError::Network(e.to_string()))?;

        tracing::debug!(url = %self.config.endpoint, chars = text.len(), "posting synthesis request");

        // Bound here so the borrow outlives the select below.
        let headers = self.headers();
        let request = self.backend.post_json(&self.config.endpoint, &headers, &body);
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!("synthesis request abandoned mid-flight");
                Err(SpeechError::Cancelled)
            }
            result = request => match result {
                Ok(response) if response.is_success() => Ok(response.body),
                Ok(response) => Err(HttpError::RequestFailed {
                    status: response.status,
                    url: self.config.endpoint.to_string(),
                }
                .into_speech_error()),
                Err(e) => Err(e.into_speech_error()),
            },
        }
    }
}

//! Internal error types for the HTTP gateway.
//!
//! These errors are internal to `livevox-http` and are mapped to
//! [`livevox_core::SpeechError`] at the port boundary.

use thiserror::Error;

/// Result type alias for gateway operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors raised while talking to the synthesis endpoint.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The endpoint answered with a non-success HTTP status.
    #[error("synthesis request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl HttpError {
    /// Map a gateway error onto the core port error.
    #[must_use]
    pub fn into_speech_error(self) -> livevox_core::SpeechError {
        match self {
            Self::RequestFailed { status, .. } => {
                livevox_core::SpeechError::RequestFailed { status }
            }
            other => livevox_core::SpeechError::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livevox_core::SpeechError;

    #[test]
    fn request_failure_keeps_the_status() {
        let err = HttpError::RequestFailed {
            status: 503,
            url: "http://localhost:4000/tts/generate".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(matches!(
            err.into_speech_error(),
            SpeechError::RequestFailed { status: 503 }
        ));
    }

    #[test]
    fn url_errors_map_to_network() {
        let err = HttpError::from("http:// bad".parse::<url::Url>().unwrap_err());
        assert!(matches!(err.into_speech_error(), SpeechError::Network(_)));
    }
}

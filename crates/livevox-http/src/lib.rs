//! livevox-http — the HTTP synthesis gateway.
//!
//! Provides [`SynthesisClient`], the production [`livevox_core::SynthesisPort`]
//! adapter: POSTs the trigger's text payload to the synthesis endpoint and
//! returns the audio bytes, with cooperative cancellation of in-flight
//! requests.

mod client;
mod error;
mod http;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::{CSRF_HEADER, SYNTHESIS_PATH, SynthesisClient, SynthesisConfig};

// Backend abstraction (for embedders supplying their own HTTP stack)
pub use error::{HttpError, HttpResult};
pub use http::{HttpBackend, HttpResponse, ReqwestBackend};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;

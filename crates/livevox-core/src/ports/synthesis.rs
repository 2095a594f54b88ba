//! Network gateway port — the opaque speech synthesis call.

use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::error::SpeechError;

/// The synthesis endpoint: text in, binary audio out.
///
/// Implementations must honor the cancellation token cooperatively —
/// return [`SpeechError::Cancelled`] once it fires rather than completing
/// the call. The controller additionally re-checks the token when the
/// result arrives, so a gateway that resolves after cancellation is
/// harmless, merely wasteful.
#[async_trait]
pub trait SynthesisPort: Send + Sync {
    /// Synthesize speech for `text`, racing against `cancel`.
    async fn synthesize(&self, text: &str, cancel: &CancellationToken)
    -> Result<Bytes, SpeechError>;
}

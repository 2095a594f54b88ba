//! Speech controller error types.

use crate::ports::TriggerId;

/// Errors that can occur in the speech controller and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// The synthesis request was cancelled by a newer activation.
    ///
    /// Expected and silent — never surfaced as an `Error` label.
    #[error("synthesis request cancelled")]
    Cancelled,

    /// The synthesis endpoint answered with a non-2xx status.
    #[error("synthesis request failed with status {status}")]
    RequestFailed { status: u16 },

    /// Transport-level failure while talking to the synthesis endpoint.
    #[error("network error during synthesis: {0}")]
    Network(String),

    /// The playback surface reported a failure.
    #[error("audio playback failed: {0}")]
    Playback(String),

    /// The referenced trigger is not known to the UI surface.
    #[error("unknown trigger {0}")]
    UnknownTrigger(TriggerId),
}

impl SpeechError {
    /// Whether this failure is an expected cancellation (silent, no label flash).
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_is_flagged() {
        assert!(SpeechError::Cancelled.is_cancelled());
        assert!(!SpeechError::RequestFailed { status: 500 }.is_cancelled());
    }

    #[test]
    fn display_includes_status() {
        let err = SpeechError::RequestFailed { status: 503 };
        assert!(err.to_string().contains("503"));
    }
}

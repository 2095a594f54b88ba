//! Trigger label markers and classification.
//!
//! Label state is derived, not stored — a trigger's label text *is* its
//! visible state. Three fixed marker strings denote the transient states;
//! any other text is the trigger's neutral (idle) label.

/// Label shown while a synthesis request is in flight.
pub const LOADING: &str = "Loading...";

/// Label shown while audio is playing.
pub const PLAYING: &str = "Playing...";

/// Label flashed after a synthesis failure.
pub const ERROR: &str = "Error";

/// Classification of a trigger's label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelState {
    /// The trigger's own idle text (actionable).
    Neutral,

    /// A synthesis request is in flight.
    Loading,

    /// Audio is playing.
    Playing,

    /// The error flash is showing.
    Error,
}

impl LabelState {
    /// Classify a label text against the fixed markers.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        match text {
            LOADING => Self::Loading,
            PLAYING => Self::Playing,
            ERROR => Self::Error,
            _ => Self::Neutral,
        }
    }

    /// Whether an activation on a trigger in this state means "stop".
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Loading | Self::Playing)
    }

    /// Whether the defensive sweep should reset a label in this state.
    #[must_use]
    pub const fn needs_sweep_reset(self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

//! Chat scroll tracking — pin-to-bottom and the jump button.
//!
//! Two behaviors from the message list:
//! - the list pins to the bottom when it mounts or new content arrives
//!   (after a short settle delay so the measurement sees the final height);
//! - a "jump to bottom" button appears only once the user has scrolled far
//!   enough up, and jumping scrolls smoothly back down.

use std::time::Duration;

/// How close to the bottom (in pixels) still counts as "at the bottom".
pub const NEAR_BOTTOM_THRESHOLD_PX: f64 = 100.0;

/// Settle delay before measuring/pinning after a content update.
pub const PIN_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// A snapshot of the scroll geometry of the message container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Current scroll offset from the top.
    pub scroll_top: f64,
    /// Total content height.
    pub scroll_height: f64,
    /// Visible viewport height.
    pub client_height: f64,
}

impl ScrollMetrics {
    /// The offset that puts the viewport at the very bottom.
    #[must_use]
    pub fn bottom_offset(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// How a scroll command should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump instantly (used when pinning on content updates).
    Auto,
    /// Animate (used for the jump button).
    Smooth,
}

/// A scroll command for the embedder to apply to the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTo {
    /// Target scroll offset.
    pub top: f64,
    /// Animation mode.
    pub behavior: ScrollBehavior,
}

/// Visibility of the jump-to-bottom button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpButtonVisibility {
    Hidden,
    Visible,
}

/// Tracks the message container's scroll position.
#[derive(Debug, Clone)]
pub struct ChatScroll {
    threshold: f64,
    last: Option<ScrollMetrics>,
}

impl ChatScroll {
    /// Create a tracker with the default near-bottom threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_threshold(NEAR_BOTTOM_THRESHOLD_PX)
    }

    /// Create a tracker with a custom near-bottom threshold.
    #[must_use]
    pub const fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            last: None,
        }
    }

    /// Record a scroll event and derive the jump button visibility.
    pub fn observe(&mut self, metrics: ScrollMetrics) -> JumpButtonVisibility {
        self.last = Some(metrics);
        if self.near_bottom() {
            JumpButtonVisibility::Hidden
        } else {
            JumpButtonVisibility::Visible
        }
    }

    /// Whether the last observed position is within the threshold of the bottom.
    ///
    /// An unobserved container counts as at-bottom (fresh mounts are pinned).
    #[must_use]
    pub fn near_bottom(&self) -> bool {
        self.last.is_none_or(|m| {
            m.scroll_top + m.client_height >= m.scroll_height - self.threshold
        })
    }

    /// The smooth-scroll command for the jump button.
    #[must_use]
    pub fn jump_to_bottom(&self, metrics: ScrollMetrics) -> ScrollTo {
        ScrollTo {
            top: metrics.bottom_offset(),
            behavior: ScrollBehavior::Smooth,
        }
    }

    /// The pin command issued on mount and on every content update.
    ///
    /// The embedder should apply it after [`PIN_SETTLE_DELAY`] so the
    /// measurement reflects the fully updated content.
    #[must_use]
    pub fn pin_to_bottom(&self, metrics: ScrollMetrics) -> ScrollTo {
        ScrollTo {
            top: metrics.bottom_offset(),
            behavior: ScrollBehavior::Auto,
        }
    }
}

impl Default for ChatScroll {
    fn default() -> Self {
        Self::new()
    }
}

//! Navigation progress bar — top bar shown during live navigation.
//!
//! The bar only appears once a page-loading phase has lasted longer than a
//! short grace delay, so fast navigations never flash it.

use std::time::{Duration, Instant};

/// Grace delay before the bar becomes visible.
pub const SHOW_GRACE: Duration = Duration::from_millis(300);

/// State of the top progress bar.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    grace: Duration,
    loading_since: Option<Instant>,
}

impl ProgressBar {
    /// Create a bar with the default grace delay.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_grace(SHOW_GRACE)
    }

    /// Create a bar with a custom grace delay.
    #[must_use]
    pub const fn with_grace(grace: Duration) -> Self {
        Self {
            grace,
            loading_since: None,
        }
    }

    /// A page-loading phase started.
    pub fn loading_started(&mut self, now: Instant) {
        // A start during an ongoing phase keeps the original clock.
        if self.loading_since.is_none() {
            self.loading_since = Some(now);
        }
    }

    /// The page-loading phase ended.
    pub fn loading_stopped(&mut self) {
        self.loading_since = None;
    }

    /// Whether the bar should currently be drawn.
    #[must_use]
    pub fn visible(&self, now: Instant) -> bool {
        self.loading_since
            .is_some_and(|since| now.duration_since(since) >= self.grace)
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_when_not_loading() {
        let bar = ProgressBar::new();
        assert!(!bar.visible(Instant::now()));
    }

    #[test]
    fn hidden_during_grace_then_visible() {
        let mut bar = ProgressBar::new();
        let t0 = Instant::now();

        bar.loading_started(t0);
        assert!(!bar.visible(t0));
        assert!(!bar.visible(t0 + Duration::from_millis(299)));
        assert!(bar.visible(t0 + Duration::from_millis(300)));
        assert!(bar.visible(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn stop_hides_immediately() {
        let mut bar = ProgressBar::new();
        let t0 = Instant::now();

        bar.loading_started(t0);
        bar.loading_stopped();
        assert!(!bar.visible(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn restart_does_not_reset_the_clock() {
        let mut bar = ProgressBar::new();
        let t0 = Instant::now();

        bar.loading_started(t0);
        bar.loading_started(t0 + Duration::from_millis(250));
        assert!(bar.visible(t0 + Duration::from_millis(300)));
    }
}

//! Dev-mode server log streaming.
//!
//! In development the live-reload channel can stream server log lines to
//! the client; this forwards them into the local `tracing` output. Disabled
//! by default and meant to stay off outside dev mode.

/// Severity of a streamed server log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerLogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Forwards streamed server log lines into `tracing`.
#[derive(Debug, Default)]
pub struct DevLogStream {
    enabled: bool,
}

impl DevLogStream {
    /// Create a stream (disabled until [`enable`](Self::enable)).
    #[must_use]
    pub const fn new() -> Self {
        Self { enabled: false }
    }

    /// Start forwarding server logs.
    pub fn enable(&mut self) {
        self.enabled = true;
        tracing::debug!("server log streaming enabled");
    }

    /// Stop forwarding server logs.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Whether forwarding is active.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Forward one server log line. Returns whether it was forwarded.
    pub fn push(&self, level: ServerLogLevel, line: &str) -> bool {
        if !self.enabled {
            return false;
        }
        match level {
            ServerLogLevel::Debug => tracing::debug!(target: "server", "{line}"),
            ServerLogLevel::Info => tracing::info!(target: "server", "{line}"),
            ServerLogLevel::Warn => tracing::warn!(target: "server", "{line}"),
            ServerLogLevel::Error => tracing::error!(target: "server", "{line}"),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        let stream = DevLogStream::new();
        assert!(!stream.is_enabled());
        assert!(!stream.push(ServerLogLevel::Info, "dropped"));
    }

    #[test]
    fn enable_disable_round_trip() {
        let mut stream = DevLogStream::new();
        stream.enable();
        assert!(stream.is_enabled());
        assert!(stream.push(ServerLogLevel::Warn, "forwarded"));

        stream.disable();
        assert!(!stream.push(ServerLogLevel::Warn, "dropped again"));
    }
}

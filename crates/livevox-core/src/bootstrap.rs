//! Page bootstrap — the composition-root glue.
//!
//! Models the thin wiring a page does at load: register named hooks on the
//! live socket, carry the CSRF token into the connect params, and connect.
//! The transport itself is an opaque external channel; only the
//! registration surface lives here.

use std::collections::BTreeMap;
use std::time::Duration;

/// Hook names registered by default (the chat scroll behaviors).
pub const SCROLL_TO_BOTTOM_HOOK: &str = "ScrollToBottom";
pub const SCROLL_BUTTON_HOOK: &str = "ScrollButton";

/// Bootstrap configuration.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Anti-forgery token sourced from page metadata; sent both in the
    /// connect params and on synthesis requests.
    pub csrf_token: Option<String>,

    /// Fall back to long polling if the socket hasn't connected by then.
    pub long_poll_fallback: Duration,

    /// Enables dev tooling (server log streaming).
    pub dev_mode: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            csrf_token: None,
            long_poll_fallback: Duration::from_millis(2500),
            dev_mode: false,
        }
    }
}

/// Named hooks registered on the live socket.
#[derive(Debug, Default)]
pub struct HookRegistry {
    names: Vec<String>,
}

impl HookRegistry {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Register a hook by name. Returns `false` on duplicates.
    pub fn register(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            tracing::warn!(hook = %name, "duplicate hook registration ignored");
            return false;
        }
        self.names.push(name);
        true
    }

    /// Whether a hook of this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Registered hook names, in registration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// The live socket wiring for one page.
#[derive(Debug)]
pub struct PageSocket {
    config: BootstrapConfig,
    hooks: HookRegistry,
    connected: bool,
}

impl PageSocket {
    /// Create a socket with no hooks registered.
    #[must_use]
    pub const fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            hooks: HookRegistry::new(),
            connected: false,
        }
    }

    /// Create a socket with the page's standard hooks pre-registered.
    #[must_use]
    pub fn with_default_hooks(config: BootstrapConfig) -> Self {
        let mut socket = Self::new(config);
        socket.hooks.register(SCROLL_TO_BOTTOM_HOOK);
        socket.hooks.register(SCROLL_BUTTON_HOOK);
        socket
    }

    /// Mutable access to the hook registry (for embedder-specific hooks).
    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// Registered hooks.
    #[must_use]
    pub const fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Params sent on connect.
    #[must_use]
    pub fn connect_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if let Some(token) = &self.config.csrf_token {
            params.insert("_csrf_token".to_owned(), token.clone());
        }
        params
    }

    /// Mark the channel connected.
    pub fn connect(&mut self) {
        if !self.connected {
            self.connected = true;
            tracing::info!(
                hooks = self.hooks.names().len(),
                long_poll_fallback_ms = self.config.long_poll_fallback.as_millis(),
                "live socket connected"
            );
        }
    }

    /// Mark the channel disconnected.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Whether the channel is connected.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether dev tooling should be wired up.
    #[must_use]
    pub const fn dev_mode(&self) -> bool {
        self.config.dev_mode
    }
}

/// Install the default `tracing` subscriber (env-filtered, stderr).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the panel is wired together for the
//! CLI adapter. All concrete implementations are instantiated here:
//! - In-memory server directory seeded from config fixtures
//! - In-memory application state seeded with the initial tool choice
//! - Channel notifier feeding the terminal loop
//!
//! Command handlers receive the composed `PanelBackend` and drive it.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::debug;

use toolpanel_core::ports::Notification;
use toolpanel_core::{PanelSettings, PanelSettingsUpdate};
use toolpanel_gui::{PanelBackend, PanelDeps};
use toolpanel_memory::{InMemoryAppState, InMemoryDirectory, ServerFixture};

use crate::error::CliError;
use crate::notifier::ChannelNotifier;

/// Contents of a `--config` file.
///
/// ```json
/// {
///   "settings": { "poll_interval_secs": 30, "duplicate_policy": "skip" },
///   "latency_ms": 250,
///   "servers": [{ "name": "filesystem", "connected": true }]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub settings: PanelSettings,
    pub servers: Vec<ServerFixture>,
    /// Artificial delay on every directory call, in milliseconds.
    pub latency_ms: u64,
}

impl PanelConfig {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
    }

    /// A small directory to play with when no config file is given.
    pub fn demo() -> Self {
        Self {
            settings: PanelSettings::with_defaults(),
            servers: vec![
                ServerFixture::new("filesystem")
                    .with_tool("read_file", "Read the contents of a file")
                    .with_tool("write_file", "Create or overwrite a file")
                    .with_tool("list_directory", "List entries in a directory")
                    .connected(),
                ServerFixture::new("web-search")
                    .with_tool("search", "Search the web and return the top results"),
                ServerFixture::new("git").failing("handshake timed out"),
            ],
            latency_ms: 400,
        }
    }

    /// Apply a `--poll-interval` override, if any.
    #[must_use]
    pub fn with_poll_interval(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.settings.merge(&PanelSettingsUpdate {
                poll_interval_secs: Some(Some(secs)),
                ..PanelSettingsUpdate::default()
            });
        }
        self
    }
}

/// Fully composed panel for CLI commands.
pub struct CliContext {
    /// The panel facade.
    pub backend: Arc<PanelBackend>,
    /// Notifications raised by the panel, in order.
    pub notifications: mpsc::UnboundedReceiver<Notification>,
}

impl CliContext {
    /// Notifications that have arrived so far, without waiting.
    pub fn pending_notifications(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            out.push(notification);
        }
        out
    }
}

/// Compose the panel from `config`.
pub fn bootstrap(config: PanelConfig) -> Result<CliContext, CliError> {
    debug!(
        servers = config.servers.len(),
        latency_ms = config.latency_ms,
        "Bootstrapping panel"
    );

    let mut directory = InMemoryDirectory::from_fixtures(config.servers);
    if config.latency_ms > 0 {
        directory = directory.with_latency(Duration::from_millis(config.latency_ms));
    }

    let state = InMemoryAppState::new(config.settings.effective_initial_tool_choice());
    let (notifier, notifications) = ChannelNotifier::channel();

    let deps = PanelDeps::new(Arc::new(directory), Arc::new(notifier), Arc::new(state));
    let backend = PanelBackend::new(deps, config.settings)?;

    Ok(CliContext {
        backend: Arc::new(backend),
        notifications,
    })
}

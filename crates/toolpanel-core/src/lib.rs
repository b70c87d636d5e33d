//! Core domain types and port definitions for toolpanel.
//!
//! This crate holds everything the connection panel orchestrator needs to
//! talk about servers without knowing how they are reached:
//!
//! - `domain` - server records, tool descriptors, snapshots, tool choice mode
//! - `ports` - trait abstractions for the remote directory, notifications
//!   and the shared application state store
//! - `settings` - panel settings and validation
//!
//! # Rules
//!
//! 1. **No runtime dependencies** - no tokio, no transport crates
//! 2. **Ports are minimal** - one trait per external collaborator
//! 3. **Domain types are serializable** - adapters ship them as-is

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    ConnectionStatus, DirectorySnapshot, ServerRecord, ToolChoice, ToolChoiceParseError,
    ToolDescriptor,
};
pub use ports::{
    AppStateStore, DirectoryError, NoopNotifier, Notification, NotificationLevel, Notifier,
    ServerDirectory,
};
pub use settings::{
    DEFAULT_POLL_INTERVAL_SECS, DuplicatePolicy, PanelSettings, PanelSettingsUpdate,
    SettingsError, validate_settings,
};

#[cfg(test)]
use serde_json as _;

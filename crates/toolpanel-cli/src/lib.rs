//! Command-line adapter for the toolpanel connection panel.
//!
//! `main.rs` parses arguments, installs logging and calls `bootstrap`;
//! everything else lives here so it can be tested without a terminal.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tokio_test as _;

// Used by main.rs only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod notifier;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, PanelConfig, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;

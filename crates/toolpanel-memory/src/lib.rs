//! In-memory adapters for the toolpanel ports.
//!
//! `InMemoryDirectory` stands in for the remote tool-provider directory,
//! `InMemoryAppState` for the application-wide state store and
//! `RecordingNotifier` for the toast channel. The CLI runs against them
//! with fixtures from a config file; tests use them to script scenarios.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tokio_test as _;

mod directory;
mod fixture;
mod notifier;
mod state;

pub use directory::{DirectoryCall, InMemoryDirectory};
pub use fixture::ServerFixture;
pub use notifier::RecordingNotifier;
pub use state::InMemoryAppState;

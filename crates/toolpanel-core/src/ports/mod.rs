//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces the panel orchestrator expects from the
//! outside world. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No transport types in any signature
//! - The directory port is async; notification and state ports are not
//! - Every port is object-safe so it can be injected as `Arc<dyn _>`

pub mod app_state;
pub mod directory;
pub mod notifier;

pub use app_state::AppStateStore;
pub use directory::{DirectoryError, ServerDirectory};
pub use notifier::{NoopNotifier, Notification, NotificationLevel, Notifier};

//! Connection panel orchestration for toolpanel adapters.
//!
//! This crate provides `PanelBackend`, a platform-agnostic orchestration
//! layer behind the tool-provider settings panel. Presentation adapters
//! (the CLI shell today, a desktop or web UI tomorrow) render its
//! `PanelView` and forward user intents to it.
//!
//! # Architecture
//!
//! ```text
//! Reads:   ServerDirectory ─► PollingCache ─► reduce() ─► PanelView
//!                                 ▲
//!                                 │ refetch (open, tick, after every op)
//!                                 │
//! Writes:  intent ─► OperationSerializer ─► ServerDirectory
//!                         │
//!                         └─ BusySet (one guard per in-flight operation)
//! ```
//!
//! # Rules
//!
//! 1. **No adapter dependencies** - Must not depend on clap, UI toolkits, etc.
//! 2. **Pure orchestration** - All collaborators injected via `PanelDeps`
//! 3. **Errors never escape operations** - Failures become notifications
//! 4. **Semantic errors** - Query methods return `GuiError`

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tokio_test as _;

mod backend;
mod busy;
mod cache;
mod deps;
mod error;
mod reducer;
mod scheduler;
mod selection;
mod serializer;

// Primary exports
pub use backend::PanelBackend;
pub use deps::PanelDeps;
pub use error::GuiError;

// Building blocks, usable on their own by adapters that compose differently
pub use busy::{BusyGuard, BusySet};
pub use cache::PollingCache;
pub use reducer::{PanelView, RowIndicator, ServerRow, reduce, toggle_operation};
pub use scheduler::PollScheduler;
pub use selection::ExpansionSet;
pub use serializer::{OperationOutcome, OperationSerializer, RunReport, ServerOperation};

// Re-export commonly used types from toolpanel-core for convenience
pub use toolpanel_core::{
    ConnectionStatus, DirectorySnapshot, PanelSettings, ServerRecord, ToolChoice, ToolDescriptor,
};

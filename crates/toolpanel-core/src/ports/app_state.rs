//! Shared application state port.
//!
//! The tool choice mode and the mirrored server list live in state owned by
//! the wider application. The panel only sees this narrow interface.

use crate::domain::{DirectorySnapshot, ToolChoice};

/// Injected application state store.
///
/// Writes must be visible to the very next read on any thread; there is
/// no intermediate value between `set_tool_choice` and `tool_choice`.
pub trait AppStateStore: Send + Sync {
    /// Currently active tool choice mode.
    fn tool_choice(&self) -> ToolChoice;

    /// Replace the tool choice mode.
    fn set_tool_choice(&self, choice: ToolChoice);

    /// Mirror a freshly fetched snapshot into shared state.
    ///
    /// Called once per accepted directory fetch, while the panel's cache
    /// is still locked for the replacement. Implementations must not call
    /// back into the panel from here.
    fn on_snapshot(&self, snapshot: &DirectorySnapshot);
}

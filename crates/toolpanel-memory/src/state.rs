//! In-memory application state store.

use std::sync::{PoisonError, RwLock};

use toolpanel_core::ports::AppStateStore;
use toolpanel_core::{DirectorySnapshot, ToolChoice};

#[derive(Debug, Default)]
struct Inner {
    tool_choice: ToolChoice,
    servers: DirectorySnapshot,
    snapshot_count: usize,
}

/// Application state held behind a `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryAppState {
    inner: RwLock<Inner>,
}

impl InMemoryAppState {
    pub fn new(tool_choice: ToolChoice) -> Self {
        Self {
            inner: RwLock::new(Inner {
                tool_choice,
                ..Inner::default()
            }),
        }
    }

    /// The last snapshot mirrored through `on_snapshot`.
    pub fn servers(&self) -> DirectorySnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .servers
            .clone()
    }

    /// How many snapshots have been mirrored.
    pub fn snapshot_count(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot_count
    }
}

impl AppStateStore for InMemoryAppState {
    fn tool_choice(&self) -> ToolChoice {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .tool_choice
    }

    fn set_tool_choice(&self, choice: ToolChoice) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .tool_choice = choice;
    }

    fn on_snapshot(&self, snapshot: &DirectorySnapshot) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.servers = snapshot.clone();
        inner.snapshot_count += 1;
    }
}

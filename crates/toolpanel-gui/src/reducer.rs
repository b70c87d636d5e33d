//! Connection state reducer.
//!
//! Pure projection of (snapshot, busy set, expansion set) into the rows a
//! presentation adapter renders. No I/O, no clocks, no shared state.

use std::collections::BTreeSet;

use serde::Serialize;

use toolpanel_core::{ConnectionStatus, DirectorySnapshot, ToolChoice, ToolDescriptor};

use crate::selection::ExpansionSet;
use crate::serializer::ServerOperation;

/// What the row's status slot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowIndicator {
    /// Operation in flight (spinner).
    Busy,
    /// Backend reported an error for this server.
    Error,
    None,
}

/// One rendered server row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRow {
    pub name: String,
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub tool_catalog: Vec<ToolDescriptor>,
    pub busy: bool,
    pub expanded: bool,
}

impl ServerRow {
    /// Busy wins over error.
    pub const fn indicator(&self) -> RowIndicator {
        if self.busy {
            RowIndicator::Busy
        } else if self.error.is_some() {
            RowIndicator::Error
        } else {
            RowIndicator::None
        }
    }

    /// Whether the connection switch accepts input.
    pub const fn interactive(&self) -> bool {
        !self.busy
    }

    pub fn has_tools(&self) -> bool {
        !self.tool_catalog.is_empty()
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

/// Everything the panel renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub tool_choice: ToolChoice,
    pub rows: Vec<ServerRow>,
}

impl PanelView {
    /// True when the directory lists no servers at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, name: &str) -> Option<&ServerRow> {
        self.rows.iter().find(|row| row.name == name)
    }
}

/// Project the snapshot into rows, in snapshot order.
///
/// Busy or expanded names that the snapshot does not list are ignored.
pub fn reduce(
    snapshot: &DirectorySnapshot,
    busy: &BTreeSet<String>,
    expanded: &ExpansionSet,
) -> Vec<ServerRow> {
    snapshot
        .iter()
        .map(|record| ServerRow {
            name: record.name.clone(),
            status: record.status,
            error: record.error.clone(),
            tool_catalog: record.tool_catalog.clone(),
            busy: busy.contains(&record.name),
            expanded: expanded.contains(&record.name),
        })
        .collect()
}

/// Decide what toggling `name` does right now.
pub fn toggle_operation(snapshot: &DirectorySnapshot, name: &str) -> ServerOperation {
    ServerOperation::toggle_for(snapshot.status_of(name))
}

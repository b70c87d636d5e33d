//! Server record and snapshot types.
//!
//! These types are shared between the orchestrator and any presentation
//! adapter, and mirror what the remote directory reports.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ports::DirectoryError;

/// Backend-reported connection state of a server.
///
/// This is never mutated optimistically on the client. In-flight state is
/// tracked separately by the busy set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Server is known but no session is open
    #[default]
    Disconnected,
    /// Server is connected and its tools are available
    Connected,
}

impl ConnectionStatus {
    /// Lowercase wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
        }
    }
}

/// A tool exposed by a connected server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name, unique within its server
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

impl ToolDescriptor {
    /// Create a new tool descriptor.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One tool-provider server as known to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    /// Unique server name, stable across refreshes.
    pub name: String,

    /// Connection state reported by the backend.
    #[serde(default)]
    pub status: ConnectionStatus,

    /// Error surfaced by the backend for the last operation on this server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Tools currently exposed, in backend order.
    /// Empty when disconnected or not yet fetched.
    #[serde(default)]
    pub tool_catalog: Vec<ToolDescriptor>,
}

impl ServerRecord {
    /// Create a record with an empty tool catalog and no error.
    pub fn new(name: impl Into<String>, status: ConnectionStatus) -> Self {
        Self {
            name: name.into(),
            status,
            error: None,
            tool_catalog: Vec::new(),
        }
    }

    /// Create a disconnected record.
    pub fn disconnected(name: impl Into<String>) -> Self {
        Self::new(name, ConnectionStatus::Disconnected)
    }

    /// Create a connected record exposing `tools`.
    pub fn connected(name: impl Into<String>, tools: Vec<ToolDescriptor>) -> Self {
        Self {
            tool_catalog: tools,
            ..Self::new(name, ConnectionStatus::Connected)
        }
    }

    /// Attach a backend error message.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

/// The ordered server list returned by one successful poll.
///
/// A snapshot is always replaced as a whole; it is never merged field by
/// field with a previous one. Server names are unique within a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectorySnapshot {
    servers: Vec<ServerRecord>,
}

impl DirectorySnapshot {
    /// The state before the first successful fetch.
    pub const fn empty() -> Self {
        Self {
            servers: Vec::new(),
        }
    }

    /// Build a snapshot from a directory listing.
    ///
    /// Fails with `DirectoryError::DuplicateServer` if two records share a name.
    pub fn from_records(servers: Vec<ServerRecord>) -> Result<Self, DirectoryError> {
        let mut seen = HashSet::with_capacity(servers.len());
        for server in &servers {
            if !seen.insert(server.name.as_str()) {
                return Err(DirectoryError::DuplicateServer(server.name.clone()));
            }
        }
        Ok(Self { servers })
    }

    /// Look up a server by name.
    pub fn get(&self, name: &str) -> Option<&ServerRecord> {
        self.servers.iter().find(|s| s.name == name)
    }

    /// Latest known status for `name`, if the server is listed.
    pub fn status_of(&self, name: &str) -> Option<ConnectionStatus> {
        self.get(name).map(|s| s.status)
    }

    pub fn servers(&self) -> &[ServerRecord] {
        &self.servers
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServerRecord> {
        self.servers.iter()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn into_records(self) -> Vec<ServerRecord> {
        self.servers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_rejects_duplicate_names() {
        let result = DirectorySnapshot::from_records(vec![
            ServerRecord::disconnected("fs"),
            ServerRecord::disconnected("web"),
            ServerRecord::connected("fs", Vec::new()),
        ]);
        assert_eq!(result, Err(DirectoryError::DuplicateServer("fs".into())));
    }

    #[test]
    fn test_snapshot_preserves_backend_order() {
        let snapshot = DirectorySnapshot::from_records(vec![
            ServerRecord::disconnected("zeta"),
            ServerRecord::disconnected("alpha"),
        ])
        .unwrap();

        let names: Vec<_> = snapshot.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert_eq!(snapshot.status_of("alpha"), Some(ConnectionStatus::Disconnected));
        assert_eq!(snapshot.status_of("missing"), None);
    }

    #[test]
    fn test_record_wire_format() {
        let record = ServerRecord::connected("fs", vec![ToolDescriptor::new("read", "Read a file")])
            .with_error("timed out");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["status"], "connected");
        assert_eq!(json["error"], "timed out");
        assert_eq!(json["toolCatalog"][0]["name"], "read");
    }

    #[test]
    fn test_record_defaults_when_fields_missing() {
        let record: ServerRecord = serde_json::from_str(r#"{"name":"web"}"#).unwrap();
        assert_eq!(record, ServerRecord::disconnected("web"));
        assert!(!record.is_connected());
    }
}

//! Declarative server fixtures.

use serde::Deserialize;

use toolpanel_core::{ServerRecord, ToolDescriptor};

/// One server the in-memory directory knows about.
///
/// Deserializes from the `servers` array of a CLI config file:
///
/// ```json
/// { "name": "fs", "connected": true,
///   "tools": [{ "name": "read_file", "description": "Read a file" }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerFixture {
    pub name: String,

    /// Tools published whenever the server is connected or refreshed.
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,

    /// Start out connected.
    #[serde(default)]
    pub connected: bool,

    /// Every mutating operation on this server fails with this message.
    #[serde(default)]
    pub failure: Option<String>,
}

impl ServerFixture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: Vec::new(),
            connected: false,
            failure: None,
        }
    }

    #[must_use]
    pub fn with_tool(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.tools.push(ToolDescriptor::new(name, description));
        self
    }

    #[must_use]
    pub fn connected(mut self) -> Self {
        self.connected = true;
        self
    }

    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// The record the directory initially lists for this fixture.
    pub fn initial_record(&self) -> ServerRecord {
        if self.connected {
            ServerRecord::connected(self.name.clone(), self.tools.clone())
        } else {
            ServerRecord::disconnected(self.name.clone())
        }
    }
}

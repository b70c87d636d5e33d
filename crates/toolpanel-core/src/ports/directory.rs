//! Remote server directory port.
//!
//! The directory is the backend that actually performs list, connect,
//! disconnect and refresh. How it reaches the tool providers is not the
//! panel's concern.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ServerRecord;

/// Failures reported by a `ServerDirectory`.
///
/// Every variant renders to a message that is safe to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The directory could not be reached at all.
    #[error("Server directory unreachable: {0}")]
    Transport(String),

    /// The named server is not known to the directory.
    #[error("Unknown server: {0}")]
    NotFound(String),

    /// A listing contained the same server name twice.
    #[error("Duplicate server in directory listing: {0}")]
    DuplicateServer(String),

    /// The backend rejected or failed the operation.
    #[error("{0}")]
    Backend(String),
}

/// Contract the panel expects from the remote server directory.
///
/// # Implementations
///
/// - `toolpanel_memory::InMemoryDirectory` - for tests and the CLI shell
/// - Adapter-specific implementations (RPC, HTTP, IPC, etc.)
#[async_trait]
pub trait ServerDirectory: Send + Sync {
    /// List all servers with their status and tool catalog.
    async fn list(&self) -> Result<Vec<ServerRecord>, DirectoryError>;

    /// Open a connection to the named server.
    async fn connect(&self, name: &str) -> Result<(), DirectoryError>;

    /// Close the connection to the named server.
    async fn disconnect(&self, name: &str) -> Result<(), DirectoryError>;

    /// Re-fetch the tool catalog of the named server.
    async fn refresh_tools(&self, name: &str) -> Result<(), DirectoryError>;
}

//! In-memory `ServerDirectory`.
//!
//! Behaves like a well-mannered remote: connect publishes the server's
//! tools, disconnect clears them, and a configured failure is recorded on
//! the server's `error` field so the next listing shows it.
//!
//! Tests can park operations with `hold_operations` to control the order
//! in which concurrent calls settle. A held `list` captures its result
//! before parking, so a listing reflects the state at call time.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use toolpanel_core::ports::{DirectoryError, ServerDirectory};
use toolpanel_core::{ConnectionStatus, ServerRecord, ToolDescriptor};

use crate::fixture::ServerFixture;

/// A call received by the directory, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
    List,
    Connect(String),
    Disconnect(String),
    RefreshTools(String),
}

#[derive(Debug)]
struct Entry {
    record: ServerRecord,
    available: Vec<ToolDescriptor>,
    failure: Option<String>,
}

impl From<ServerFixture> for Entry {
    fn from(fixture: ServerFixture) -> Self {
        Self {
            record: fixture.initial_record(),
            available: fixture.tools,
            failure: fixture.failure,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    servers: Vec<Entry>,
    list_failure: Option<String>,
    raw_listing: Option<Vec<ServerRecord>>,
    calls: Vec<DirectoryCall>,
}

impl Inner {
    fn entry_mut(&mut self, name: &str) -> Result<&mut Entry, DirectoryError> {
        self.servers
            .iter_mut()
            .find(|e| e.record.name == name)
            .ok_or_else(|| DirectoryError::NotFound(name.to_string()))
    }
}

/// Scriptable in-memory server directory.
#[derive(Debug)]
pub struct InMemoryDirectory {
    inner: Mutex<Inner>,
    latency: Option<Duration>,
    held: watch::Sender<bool>,
    pending: watch::Sender<usize>,
}

impl InMemoryDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::from_fixtures(Vec::new())
    }

    pub fn from_fixtures(fixtures: Vec<ServerFixture>) -> Self {
        let (held, _) = watch::channel(false);
        let (pending, _) = watch::channel(0);
        Self {
            inner: Mutex::new(Inner {
                servers: fixtures.into_iter().map(Entry::from).collect(),
                ..Inner::default()
            }),
            latency: None,
            held,
            pending,
        }
    }

    /// Delay every call by `latency` after it has been recorded.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Scripting
    // =========================================================================

    /// Make `list` fail with a transport error until cleared with `None`.
    pub fn set_list_failure(&self, message: Option<&str>) {
        self.inner().list_failure = message.map(str::to_string);
    }

    /// Return exactly these records from `list`, bypassing the server table.
    pub fn set_raw_listing(&self, records: Option<Vec<ServerRecord>>) {
        self.inner().raw_listing = records;
    }

    /// Fail every mutating operation on `name` with `message`.
    pub fn set_operation_failure(&self, name: &str, message: Option<&str>) -> bool {
        self.inner().entry_mut(name).is_ok_and(|entry| {
            entry.failure = message.map(str::to_string);
            true
        })
    }

    /// Change the tools `name` publishes on its next connect or refresh.
    pub fn set_available_tools(&self, name: &str, tools: Vec<ToolDescriptor>) -> bool {
        self.inner().entry_mut(name).is_ok_and(|entry| {
            entry.available = tools;
            true
        })
    }

    /// Flip a server's state behind the panel's back.
    pub fn set_connected(&self, name: &str, connected: bool) -> bool {
        self.inner().entry_mut(name).is_ok_and(|entry| {
            apply_status(entry, connected);
            true
        })
    }

    /// Park every subsequent call until `release_operations`.
    pub fn hold_operations(&self) {
        self.held.send_replace(true);
    }

    pub fn release_operations(&self) {
        self.held.send_replace(false);
    }

    /// Wait until at least `count` calls are parked.
    pub async fn wait_for_pending(&self, count: usize) {
        let mut rx = self.pending.subscribe();
        let _ = rx.wait_for(|pending| *pending >= count).await;
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.inner().calls.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.inner()
            .calls
            .iter()
            .filter(|call| **call == DirectoryCall::List)
            .count()
    }

    /// Mutating calls received for `name`.
    pub fn operations_on(&self, name: &str) -> Vec<DirectoryCall> {
        self.inner()
            .calls
            .iter()
            .filter(|call| match call {
                DirectoryCall::List => false,
                DirectoryCall::Connect(n)
                | DirectoryCall::Disconnect(n)
                | DirectoryCall::RefreshTools(n) => n == name,
            })
            .cloned()
            .collect()
    }

    pub fn record(&self, name: &str) -> Option<ServerRecord> {
        self.inner()
            .servers
            .iter()
            .find(|e| e.record.name == name)
            .map(|e| e.record.clone())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn settle(&self) {
        if *self.held.borrow() {
            self.pending.send_modify(|p| *p += 1);
            let mut rx = self.held.subscribe();
            let _ = rx.wait_for(|held| !*held).await;
            self.pending.send_modify(|p| *p = p.saturating_sub(1));
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn mutate(
        &self,
        name: &str,
        apply: impl FnOnce(&mut Entry) -> Result<(), DirectoryError>,
    ) -> Result<(), DirectoryError> {
        let mut inner = self.inner();
        let entry = inner.entry_mut(name)?;
        if let Some(message) = entry.failure.clone() {
            entry.record.error = Some(message.clone());
            return Err(DirectoryError::Backend(message));
        }
        apply(entry)?;
        entry.record.error = None;
        drop(inner);
        Ok(())
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_status(entry: &mut Entry, connected: bool) {
    if connected {
        entry.record.status = ConnectionStatus::Connected;
        entry.record.tool_catalog.clone_from(&entry.available);
    } else {
        entry.record.status = ConnectionStatus::Disconnected;
        entry.record.tool_catalog.clear();
    }
}

#[async_trait]
impl ServerDirectory for InMemoryDirectory {
    async fn list(&self) -> Result<Vec<ServerRecord>, DirectoryError> {
        let listing = {
            let mut inner = self.inner();
            inner.calls.push(DirectoryCall::List);
            if let Some(message) = &inner.list_failure {
                Err(DirectoryError::Transport(message.clone()))
            } else if let Some(raw) = &inner.raw_listing {
                Ok(raw.clone())
            } else {
                Ok(inner.servers.iter().map(|e| e.record.clone()).collect())
            }
        };
        self.settle().await;
        listing
    }

    async fn connect(&self, name: &str) -> Result<(), DirectoryError> {
        self.inner()
            .calls
            .push(DirectoryCall::Connect(name.to_string()));
        self.settle().await;
        debug!(server_name = %name, "In-memory connect");
        self.mutate(name, |entry| {
            apply_status(entry, true);
            Ok(())
        })
    }

    async fn disconnect(&self, name: &str) -> Result<(), DirectoryError> {
        self.inner()
            .calls
            .push(DirectoryCall::Disconnect(name.to_string()));
        self.settle().await;
        debug!(server_name = %name, "In-memory disconnect");
        self.mutate(name, |entry| {
            apply_status(entry, false);
            Ok(())
        })
    }

    async fn refresh_tools(&self, name: &str) -> Result<(), DirectoryError> {
        self.inner()
            .calls
            .push(DirectoryCall::RefreshTools(name.to_string()));
        self.settle().await;
        debug!(server_name = %name, "In-memory tool refresh");
        self.mutate(name, |entry| {
            if !entry.record.is_connected() {
                return Err(DirectoryError::Backend(format!(
                    "{} is not connected",
                    entry.record.name
                )));
            }
            entry.record.tool_catalog.clone_from(&entry.available);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio_test::assert_err;

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::from_fixtures(vec![
            ServerFixture::new("fs").with_tool("read_file", "Read a file"),
            ServerFixture::new("web").failing("handshake failed"),
        ])
    }

    #[tokio::test]
    async fn test_connect_publishes_tools() {
        let dir = directory();
        dir.connect("fs").await.unwrap();

        let listing = dir.list().await.unwrap();
        assert!(listing[0].is_connected());
        assert_eq!(listing[0].tool_catalog.len(), 1);
        assert_eq!(
            dir.calls(),
            [
                DirectoryCall::Connect("fs".into()),
                DirectoryCall::List
            ]
        );
    }

    #[tokio::test]
    async fn test_disconnect_clears_tools() {
        let dir = directory();
        dir.connect("fs").await.unwrap();
        dir.disconnect("fs").await.unwrap();

        let record = dir.record("fs").unwrap();
        assert!(!record.is_connected());
        assert!(record.tool_catalog.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_recorded_on_server() {
        let dir = directory();
        let err = dir.connect("web").await.unwrap_err();

        assert_eq!(err, DirectoryError::Backend("handshake failed".into()));
        let record = dir.record("web").unwrap();
        assert_eq!(record.error.as_deref(), Some("handshake failed"));
        assert!(!record.is_connected());

        dir.set_operation_failure("web", None);
        dir.connect("web").await.unwrap();
        assert_eq!(dir.record("web").unwrap().error, None);
    }

    #[tokio::test]
    async fn test_unknown_server_is_not_found() {
        let dir = directory();
        assert_eq!(
            dir.connect("ghost").await,
            Err(DirectoryError::NotFound("ghost".into()))
        );
        assert!(!dir.set_connected("ghost", true));
    }

    #[tokio::test]
    async fn test_refresh_requires_connection() {
        let dir = directory();
        assert_err!(dir.refresh_tools("fs").await);

        dir.connect("fs").await.unwrap();
        dir.set_available_tools("fs", vec![ToolDescriptor::new("grep", "")]);
        dir.refresh_tools("fs").await.unwrap();
        assert_eq!(dir.record("fs").unwrap().tool_catalog[0].name, "grep");
        assert_eq!(dir.operations_on("fs").len(), 3);
    }

    #[tokio::test]
    async fn test_list_failure_and_raw_listing() {
        let dir = directory();
        dir.set_list_failure(Some("offline"));
        assert_eq!(
            dir.list().await,
            Err(DirectoryError::Transport("offline".into()))
        );

        dir.set_list_failure(None);
        dir.set_raw_listing(Some(vec![ServerRecord::disconnected("only")]));
        assert_eq!(dir.list().await.unwrap().len(), 1);
        assert_eq!(dir.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_held_operations_wait_for_release() {
        let dir = Arc::new(directory());
        dir.hold_operations();

        let task = tokio::spawn({
            let dir = Arc::clone(&dir);
            async move { dir.connect("fs").await }
        });
        dir.wait_for_pending(1).await;
        assert!(!dir.record("fs").unwrap().is_connected());

        dir.release_operations();
        task.await.unwrap().unwrap();
        assert!(dir.record("fs").unwrap().is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_delays_calls() {
        let dir = directory().with_latency(Duration::from_millis(500));
        let started = tokio::time::Instant::now();
        dir.list().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}

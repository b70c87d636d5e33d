//! Per-server operation serializer.
//!
//! Wraps one mutating action on a named server with busy tracking,
//! a post-operation refetch and error isolation. The sequence is:
//!
//! 1. acquire the busy entry (synchronously, before any await)
//! 2. run the action
//! 3. kick off a directory refetch, whatever the outcome
//! 4. route a failure to the notifier instead of returning it
//! 5. release the busy entry (guard drop, on every exit path)

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use toolpanel_core::ports::{DirectoryError, Notification, Notifier};
use toolpanel_core::{ConnectionStatus, DuplicatePolicy};

use crate::busy::BusySet;
use crate::cache::PollingCache;

/// A mutating operation on one server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerOperation {
    Connect,
    Disconnect,
    RefreshTools,
}

impl ServerOperation {
    /// The toggle action for a server last seen with `status`.
    ///
    /// Connected servers get disconnected; anything else, including a
    /// server missing from the snapshot, gets a connect.
    pub const fn toggle_for(status: Option<ConnectionStatus>) -> Self {
        match status {
            Some(ConnectionStatus::Connected) => Self::Disconnect,
            Some(ConnectionStatus::Disconnected) | None => Self::Connect,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::RefreshTools => "refresh_tools",
        }
    }
}

impl fmt::Display for ServerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single `run` ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// The action succeeded.
    Completed,
    /// The action failed; the user has already been notified.
    Failed(DirectoryError),
    /// The server was already busy and the policy said to skip.
    /// No action, no refetch, no notification.
    Skipped,
}

impl OperationOutcome {
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Result of `OperationSerializer::run`.
///
/// The busy entry is already released when this is returned. The refetch
/// it triggered may still be in flight; `settled` waits for it.
#[derive(Debug)]
#[must_use]
pub struct RunReport {
    outcome: OperationOutcome,
    refetch: Option<JoinHandle<()>>,
}

impl RunReport {
    fn skipped() -> Self {
        Self {
            outcome: OperationOutcome::Skipped,
            refetch: None,
        }
    }

    pub const fn outcome(&self) -> &OperationOutcome {
        &self.outcome
    }

    /// Whether this run started a directory refetch.
    pub const fn refetch_started(&self) -> bool {
        self.refetch.is_some()
    }

    /// Wait for the triggered refetch to settle, then return the outcome.
    pub async fn settled(self) -> OperationOutcome {
        if let Some(handle) = self.refetch {
            if let Err(e) = handle.await {
                warn!(error = %e, "Post-operation refetch task failed");
            }
        }
        self.outcome
    }

    /// Return the outcome and let the refetch finish in the background.
    pub fn into_outcome(self) -> OperationOutcome {
        self.outcome
    }
}

/// Serializes mutating operations per server name.
pub struct OperationSerializer {
    busy: BusySet,
    cache: Arc<PollingCache>,
    notifier: Arc<dyn Notifier>,
    policy: DuplicatePolicy,
}

impl OperationSerializer {
    pub fn new(
        busy: BusySet,
        cache: Arc<PollingCache>,
        notifier: Arc<dyn Notifier>,
        policy: DuplicatePolicy,
    ) -> Self {
        Self {
            busy,
            cache,
            notifier,
            policy,
        }
    }

    pub const fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Run `action` for `name` under the busy guard.
    ///
    /// Never returns the action's error; failures are notified and
    /// reported as `OperationOutcome::Failed`.
    pub async fn run<F, Fut>(&self, name: &str, action: F) -> RunReport
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), DirectoryError>>,
    {
        let Some(guard) = self.busy.try_acquire(name, self.policy) else {
            debug!(server_name = %name, "Server busy, skipping duplicate operation");
            return RunReport::skipped();
        };

        debug!(server_name = %name, "Operation started");
        let result = action().await;

        let refetch = self.cache.spawn_refetch();

        let outcome = match result {
            Ok(()) => {
                debug!(server_name = %name, "Operation completed");
                OperationOutcome::Completed
            }
            Err(e) => {
                warn!(server_name = %name, error = %e, "Operation failed");
                self.notifier
                    .notify(Notification::server_error(name, e.to_string()));
                OperationOutcome::Failed(e)
            }
        };

        drop(guard);

        RunReport {
            outcome,
            refetch: Some(refetch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;
    use tokio_test::assert_ok;
    use toolpanel_core::ports::ServerDirectory;
    use toolpanel_core::{ServerRecord, ToolChoice};
    use toolpanel_memory::{InMemoryAppState, RecordingNotifier};

    use crate::deps::PanelDeps;

    mock! {
        pub Directory {}

        #[async_trait]
        impl ServerDirectory for Directory {
            async fn list(&self) -> Result<Vec<ServerRecord>, DirectoryError>;
            async fn connect(&self, name: &str) -> Result<(), DirectoryError>;
            async fn disconnect(&self, name: &str) -> Result<(), DirectoryError>;
            async fn refresh_tools(&self, name: &str) -> Result<(), DirectoryError>;
        }
    }

    fn serializer(
        directory: MockDirectory,
        policy: DuplicatePolicy,
    ) -> (OperationSerializer, Arc<dyn ServerDirectory>, Arc<RecordingNotifier>) {
        let directory: Arc<dyn ServerDirectory> = Arc::new(directory);
        let notifier = Arc::new(RecordingNotifier::new());
        let state = Arc::new(InMemoryAppState::new(ToolChoice::Auto));
        let deps = PanelDeps::new(Arc::clone(&directory), notifier.clone(), state);
        let cache = Arc::new(PollingCache::new(&deps));
        let serializer = OperationSerializer::new(BusySet::new(), cache, notifier.clone(), policy);
        (serializer, directory, notifier)
    }

    #[test]
    fn test_toggle_for_status() {
        assert_eq!(
            ServerOperation::toggle_for(Some(ConnectionStatus::Connected)),
            ServerOperation::Disconnect
        );
        assert_eq!(
            ServerOperation::toggle_for(Some(ConnectionStatus::Disconnected)),
            ServerOperation::Connect
        );
        assert_eq!(ServerOperation::toggle_for(None), ServerOperation::Connect);
    }

    #[tokio::test]
    async fn test_success_triggers_exactly_one_refetch() {
        let mut mock = MockDirectory::new();
        mock.expect_connect()
            .with(eq("fs"))
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_list()
            .times(1)
            .returning(|| Ok(vec![ServerRecord::connected("fs", Vec::new())]));

        let (serializer, directory, notifier) = serializer(mock, DuplicatePolicy::Skip);
        let report = serializer
            .run("fs", || async move { directory.connect("fs").await })
            .await;

        assert!(report.refetch_started());
        assert!(!serializer.busy.contains("fs"));
        assert_eq!(report.settled().await, OperationOutcome::Completed);
        assert!(notifier.is_empty());
        assert!(serializer.cache.snapshot().get("fs").unwrap().is_connected());
    }

    #[tokio::test]
    async fn test_failure_is_notified_once_and_still_refetches() {
        let mut mock = MockDirectory::new();
        mock.expect_connect()
            .times(1)
            .returning(|_| Err(DirectoryError::Backend("unreachable".into())));
        mock.expect_list().times(1).returning(|| {
            Ok(vec![
                ServerRecord::disconnected("b").with_error("unreachable"),
            ])
        });

        let (serializer, directory, notifier) = serializer(mock, DuplicatePolicy::Skip);
        let outcome = serializer
            .run("b", || async move { directory.connect("b").await })
            .await
            .settled()
            .await;

        assert_eq!(
            outcome,
            OperationOutcome::Failed(DirectoryError::Backend("unreachable".into()))
        );
        assert!(serializer.busy.is_empty());
        assert_eq!(notifier.len(), 1);
        assert_eq!(notifier.all()[0].server_name.as_deref(), Some("b"));

        let record = serializer.cache.snapshot().get("b").cloned().unwrap();
        assert_eq!(record.error.as_deref(), Some("unreachable"));
    }

    #[tokio::test]
    async fn test_refetch_failure_does_not_leave_server_busy() {
        let mut mock = MockDirectory::new();
        mock.expect_refresh_tools().times(1).returning(|_| Ok(()));
        mock.expect_list()
            .times(1)
            .returning(|| Err(DirectoryError::Transport("timeout".into())));

        let (serializer, directory, notifier) = serializer(mock, DuplicatePolicy::Skip);
        let outcome = serializer
            .run("fs", || async move { directory.refresh_tools("fs").await })
            .await
            .settled()
            .await;

        assert!(outcome.is_completed());
        assert!(serializer.busy.is_empty());
        // Only the fetch error; the operation itself succeeded.
        assert_eq!(notifier.len(), 1);
        assert_eq!(notifier.all()[0].server_name, None);
    }

    #[tokio::test]
    async fn test_busy_is_held_while_action_runs() {
        let (serializer, _directory, _notifier) = serializer(
            {
                let mut mock = MockDirectory::new();
                mock.expect_list().returning(|| Ok(Vec::new()));
                mock
            },
            DuplicatePolicy::Skip,
        );

        let busy = serializer.busy.clone();
        let report = serializer
            .run("fs", || async move {
                assert!(busy.contains("fs"), "busy must be set before the action starts");
                Ok(())
            })
            .await;

        assert_ok!(match report.settled().await {
            OperationOutcome::Completed => Ok(()),
            other => Err(other),
        });
        assert!(serializer.busy.is_empty());
    }

    #[tokio::test]
    async fn test_skip_policy_ignores_duplicate_run() {
        let mut mock = MockDirectory::new();
        mock.expect_connect().never();
        mock.expect_list().never();

        let (serializer, directory, notifier) = serializer(mock, DuplicatePolicy::Skip);
        let _held = serializer
            .busy
            .try_acquire("fs", DuplicatePolicy::Skip)
            .unwrap();

        let report = serializer
            .run("fs", || async move { directory.connect("fs").await })
            .await;

        assert!(!report.refetch_started());
        assert_eq!(report.settled().await, OperationOutcome::Skipped);
        assert!(notifier.is_empty());
        assert!(serializer.busy.contains("fs"), "original holder keeps its entry");
    }

    #[tokio::test]
    async fn test_allow_policy_runs_duplicate() {
        let mut mock = MockDirectory::new();
        mock.expect_connect().times(1).returning(|_| Ok(()));
        mock.expect_list().times(1).returning(|| Ok(Vec::new()));

        let (serializer, directory, _notifier) = serializer(mock, DuplicatePolicy::Allow);
        let held = serializer
            .busy
            .try_acquire("fs", DuplicatePolicy::Allow)
            .unwrap();

        let outcome = serializer
            .run("fs", || async move { directory.connect("fs").await })
            .await
            .settled()
            .await;

        assert!(outcome.is_completed());
        assert!(serializer.busy.contains("fs"));
        drop(held);
        assert!(serializer.busy.is_empty());
    }
}

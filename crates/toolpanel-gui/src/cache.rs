//! Polling cache over the remote server directory.
//!
//! Holds the latest accepted `DirectorySnapshot`. A successful fetch
//! replaces it wholesale and mirrors it into application state; a failed
//! fetch leaves it untouched and notifies the user. Nothing here decides
//! *when* to fetch: the scheduler, the panel-open transition and the
//! operation serializer do.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use toolpanel_core::DirectorySnapshot;
use toolpanel_core::ports::{
    AppStateStore, DirectoryError, Notification, Notifier, ServerDirectory,
};

use crate::deps::PanelDeps;

/// Latest-snapshot cache with manual and scheduled refetch.
pub struct PollingCache {
    directory: Arc<dyn ServerDirectory>,
    notifier: Arc<dyn Notifier>,
    state: Arc<dyn AppStateStore>,
    snapshot: watch::Sender<Arc<DirectorySnapshot>>,
    /// Sequence number handed to the most recently started fetch.
    requested: AtomicU64,
    /// Sequence number of the fetch whose result is currently held.
    applied: AtomicU64,
}

impl PollingCache {
    /// Create an empty cache. The first snapshot is empty, not "loading".
    pub fn new(deps: &PanelDeps) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(DirectorySnapshot::empty()));
        Self {
            directory: Arc::clone(&deps.directory),
            notifier: Arc::clone(&deps.notifier),
            state: Arc::clone(&deps.state),
            snapshot: tx,
            requested: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    /// The currently held snapshot.
    pub fn snapshot(&self) -> Arc<DirectorySnapshot> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to accepted snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DirectorySnapshot>> {
        self.snapshot.subscribe()
    }

    /// Number of fetches started since creation.
    pub fn fetch_count(&self) -> u64 {
        self.requested.load(Ordering::SeqCst)
    }

    /// Fetch the directory listing and replace the snapshot on success.
    ///
    /// On failure the previous snapshot is kept as-is and the error is
    /// routed to the notifier before being returned.
    ///
    /// Overlapping fetches may settle out of order; a result older than the
    /// one already held is discarded so the cache never moves backwards,
    /// and the caller receives the held snapshot instead. Acceptance and the
    /// mirror into application state happen under the same lock, so the
    /// mirrored snapshot always matches the held one.
    pub async fn fetch(&self) -> Result<Arc<DirectorySnapshot>, DirectoryError> {
        let seq = self.requested.fetch_add(1, Ordering::SeqCst) + 1;

        let listing = self
            .directory
            .list()
            .await
            .and_then(DirectorySnapshot::from_records);

        let snapshot = match listing {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                warn!(error = %e, "Failed to fetch server directory");
                self.notifier.notify(Notification::error(e.to_string()));
                return Err(e);
            }
        };

        let mut held = Arc::clone(&snapshot);
        let accepted = self.snapshot.send_if_modified(|current| {
            if seq <= self.applied.load(Ordering::SeqCst) {
                held = Arc::clone(current);
                return false;
            }
            self.applied.store(seq, Ordering::SeqCst);
            *current = Arc::clone(&snapshot);
            self.state.on_snapshot(&snapshot);
            true
        });

        if accepted {
            debug!(seq, server_count = snapshot.len(), "Server directory refreshed");
        } else {
            debug!(seq, "Discarding out-of-order directory listing");
        }

        Ok(held)
    }

    /// Start a fetch on the runtime without waiting for it.
    ///
    /// The returned handle resolves once the fetch has settled. Errors are
    /// already logged and notified by `fetch`.
    pub fn spawn_refetch(self: &Arc<Self>) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let _ = cache.fetch().await;
        })
    }
}

//! Periodic refetch while the panel is visible.
//!
//! The scheduler talks only to the `PollingCache`. It knows nothing about
//! rows, operations or the busy set.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::PollingCache;

/// How long `stop` waits for an in-flight tick before aborting it.
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Start/stop handle around a background polling task.
pub struct PollScheduler {
    cache: Arc<PollingCache>,
    period: Duration,
    running: Mutex<Option<Running>>,
}

impl PollScheduler {
    pub fn new(cache: Arc<PollingCache>, period: Duration) -> Self {
        Self {
            cache,
            period,
            running: Mutex::new(None),
        }
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    fn running(&self) -> MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start polling. The first tick fires one full period from now.
    ///
    /// Returns `false` if a polling task is already running. Must be called
    /// from within a Tokio runtime.
    pub fn start(&self) -> bool {
        let mut running = self.running();
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            return false;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.cache),
            self.period,
            cancel.clone(),
        ));
        *running = Some(Running { cancel, handle });

        debug!(period_secs = self.period.as_secs(), "Poll scheduler started");
        true
    }

    /// Stop polling and wait for the task to exit.
    ///
    /// A fetch already in flight is allowed to finish; if it takes longer
    /// than two seconds the task is aborted.
    pub async fn stop(&self) {
        let Some(Running { cancel, mut handle }) = self.running().take() else {
            return;
        };

        cancel.cancel();
        if timeout(STOP_TIMEOUT, &mut handle).await.is_err() {
            warn!("Poll scheduler did not stop in time, aborting");
            handle.abort();
        }
        debug!("Poll scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running()
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        if let Some(running) = self.running().take() {
            running.cancel.cancel();
        }
    }
}

async fn poll_loop(cache: Arc<PollingCache>, period: Duration, cancel: CancellationToken) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!("Poll tick");
                // Errors are already logged and notified by the cache.
                let _ = cache.fetch().await;
            }
            () = cancel.cancelled() => break,
        }
    }
}

//! `PanelBackend` - the connection panel orchestration facade.
//!
//! This is the single entry point presentation adapters talk to. It owns
//! the polling cache, busy set, operation serializer, expansion state and
//! poll scheduler, and wires them to the injected collaborators.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info};

use toolpanel_core::{
    DirectorySnapshot, PanelSettings, ToolChoice, ToolDescriptor, validate_settings,
};

use crate::busy::BusySet;
use crate::cache::PollingCache;
use crate::deps::PanelDeps;
use crate::error::GuiError;
use crate::reducer::{PanelView, reduce, toggle_operation};
use crate::scheduler::PollScheduler;
use crate::selection::ExpansionSet;
use crate::serializer::{OperationSerializer, RunReport, ServerOperation};

/// Connection panel facade.
///
/// Mutating operations (`toggle_connection`, `refresh_tools`) never return
/// an error: failures are routed to the notifier and show up on the row
/// after the refetch. Query methods return `GuiError`.
///
/// # Construction
///
/// ```ignore
/// let deps = PanelDeps::new(directory, notifier, state);
/// let backend = Arc::new(PanelBackend::new(deps, settings)?);
/// backend.open().await;
/// ```
pub struct PanelBackend {
    deps: PanelDeps,
    settings: PanelSettings,
    cache: Arc<PollingCache>,
    busy: BusySet,
    serializer: OperationSerializer,
    scheduler: PollScheduler,
    expanded: Mutex<ExpansionSet>,
    open: AtomicBool,
}

impl PanelBackend {
    /// Create a closed panel with an empty snapshot.
    ///
    /// Nothing is fetched until the panel is opened or `refetch` is called.
    pub fn new(deps: PanelDeps, settings: PanelSettings) -> Result<Self, GuiError> {
        validate_settings(&settings)?;

        let cache = Arc::new(PollingCache::new(&deps));
        let busy = BusySet::new();
        let serializer = OperationSerializer::new(
            busy.clone(),
            Arc::clone(&cache),
            Arc::clone(&deps.notifier),
            settings.effective_duplicate_policy(),
        );
        let scheduler = PollScheduler::new(Arc::clone(&cache), settings.effective_poll_interval());

        Ok(Self {
            deps,
            settings,
            cache,
            busy,
            serializer,
            scheduler,
            expanded: Mutex::new(ExpansionSet::new()),
            open: AtomicBool::new(false),
        })
    }

    pub const fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    fn expanded(&self) -> MutexGuard<'_, ExpansionSet> {
        self.expanded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Open the panel.
    ///
    /// On the closed→open transition this refetches once (unless disabled
    /// in settings) and starts periodic polling. Returns `false` if the
    /// panel was already open, in which case nothing happens.
    pub async fn open(&self) -> bool {
        if self.open.swap(true, Ordering::SeqCst) {
            return false;
        }
        debug!("Panel opened");

        self.scheduler.start();
        if self.settings.effective_refetch_on_open() {
            // Failures are notified by the cache; the panel keeps its snapshot.
            let _ = self.cache.fetch().await;
        }
        true
    }

    /// Close the panel and stop periodic polling.
    ///
    /// In-flight operations are not cancelled. Returns `false` if the panel
    /// was already closed.
    pub async fn close(&self) -> bool {
        if !self.open.swap(false, Ordering::SeqCst) {
            return false;
        }
        self.scheduler.stop().await;
        debug!("Panel closed");
        true
    }

    /// Drive visibility from an external open/closed signal.
    pub async fn set_open(&self, open: bool) -> bool {
        if open {
            self.open().await
        } else {
            self.close().await
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn is_polling(&self) -> bool {
        self.scheduler.is_running()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Render the current state.
    pub fn view(&self) -> PanelView {
        let snapshot = self.cache.snapshot();
        let rows = reduce(&snapshot, &self.busy.names(), &self.expanded());
        PanelView {
            tool_choice: self.deps.state.tool_choice(),
            rows,
        }
    }

    pub fn snapshot(&self) -> Arc<DirectorySnapshot> {
        self.cache.snapshot()
    }

    /// Fetch the directory now and return the snapshot the panel holds
    /// afterwards.
    ///
    /// The error is returned for callers that want it, but it has already
    /// been notified and the previous snapshot is still in place.
    pub async fn refetch(&self) -> Result<Arc<DirectorySnapshot>, GuiError> {
        Ok(self.cache.fetch().await?)
    }

    /// Tool catalog of one server from the current snapshot.
    pub fn server_tools(&self, name: &str) -> Result<Vec<ToolDescriptor>, GuiError> {
        self.cache
            .snapshot()
            .get(name)
            .map(|record| record.tool_catalog.clone())
            .ok_or_else(|| GuiError::NotFound {
                entity: "server",
                id: name.to_string(),
            })
    }

    /// A single tool of one server, for the detail view.
    pub fn tool(&self, name: &str, tool: &str) -> Result<ToolDescriptor, GuiError> {
        self.server_tools(name)?
            .into_iter()
            .find(|descriptor| descriptor.name == tool)
            .ok_or_else(|| GuiError::NotFound {
                entity: "tool",
                id: format!("{name}/{tool}"),
            })
    }

    pub fn is_busy(&self, name: &str) -> bool {
        self.busy.contains(name)
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<Arc<DirectorySnapshot>> {
        self.cache.subscribe()
    }

    pub fn subscribe_busy(&self) -> watch::Receiver<BTreeMap<String, usize>> {
        self.busy.subscribe()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Connect or disconnect `name` depending on its latest known status.
    pub async fn toggle_connection(&self, name: &str) -> RunReport {
        let operation = toggle_operation(&self.cache.snapshot(), name);
        self.run_operation(name, operation).await
    }

    /// Ask the backend to re-read the tool catalog of `name`.
    pub async fn refresh_tools(&self, name: &str) -> RunReport {
        self.run_operation(name, ServerOperation::RefreshTools).await
    }

    /// Run `operation` on `name` through the serializer.
    pub async fn run_operation(&self, name: &str, operation: ServerOperation) -> RunReport {
        debug!(server_name = %name, %operation, "Dispatching server operation");
        let directory = Arc::clone(&self.deps.directory);
        let target = name.to_string();
        self.serializer
            .run(name, move || async move {
                match operation {
                    ServerOperation::Connect => directory.connect(&target).await,
                    ServerOperation::Disconnect => directory.disconnect(&target).await,
                    ServerOperation::RefreshTools => directory.refresh_tools(&target).await,
                }
            })
            .await
    }

    /// Expand or collapse the tool list of `name`. Returns the new state.
    pub fn toggle_expansion(&self, name: &str) -> bool {
        self.expanded().toggle(name)
    }

    // =========================================================================
    // Tool choice
    // =========================================================================

    pub fn tool_choice(&self) -> ToolChoice {
        self.deps.state.tool_choice()
    }

    pub fn set_tool_choice(&self, choice: ToolChoice) {
        self.deps.state.set_tool_choice(choice);
        info!(tool_choice = %choice, "Tool choice updated");
    }

    /// Parse and apply a tool choice from user input.
    pub fn set_tool_choice_str(&self, input: &str) -> Result<ToolChoice, GuiError> {
        let choice: ToolChoice = input.parse()?;
        self.set_tool_choice(choice);
        Ok(choice)
    }

    /// Close the panel. In-flight operations finish on their own.
    pub async fn shutdown(&self) {
        self.close().await;
    }
}

//! Dependency injection for `PanelBackend`.
//!
//! All dependencies are injected as trait objects to maintain adapter neutrality.

use std::sync::Arc;

use toolpanel_core::ports::{AppStateStore, Notifier, ServerDirectory};

/// Dependencies required to construct a `PanelBackend`.
///
/// All fields are private to enforce construction via `PanelDeps::new()`.
///
/// # Example
///
/// ```ignore
/// let deps = PanelDeps::new(directory, notifier, state);
/// let backend = PanelBackend::new(deps, PanelSettings::with_defaults())?;
/// ```
#[derive(Clone)]
pub struct PanelDeps {
    /// Remote directory performing list/connect/disconnect/refresh.
    pub(crate) directory: Arc<dyn ServerDirectory>,
    /// User-visible notification channel.
    pub(crate) notifier: Arc<dyn Notifier>,
    /// Shared application state (tool choice, mirrored server list).
    pub(crate) state: Arc<dyn AppStateStore>,
}

impl PanelDeps {
    pub fn new(
        directory: Arc<dyn ServerDirectory>,
        notifier: Arc<dyn Notifier>,
        state: Arc<dyn AppStateStore>,
    ) -> Self {
        Self {
            directory,
            notifier,
            state,
        }
    }

    pub fn directory(&self) -> &Arc<dyn ServerDirectory> {
        &self.directory
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn state(&self) -> &Arc<dyn AppStateStore> {
        &self.state
    }
}

//! Panel settings and validation.
//!
//! Pure configuration types with no infrastructure dependencies. Adapters
//! load them from wherever they like (config file, env, UI) and hand them
//! to the panel backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ToolChoice;

/// Default interval between automatic directory polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Upper bound for the poll interval (one day).
const MAX_POLL_INTERVAL_SECS: u64 = 86_400;

/// What to do when an operation is requested for a server that is already busy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Ignore the second request; the in-flight operation wins.
    #[default]
    Skip,
    /// Run it anyway; the server stays busy until the last one finishes.
    Allow,
}

/// Connection panel settings.
///
/// All fields are optional to support partial config files and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PanelSettings {
    /// Seconds between automatic directory polls while the panel is open.
    pub poll_interval_secs: Option<u64>,

    /// Handling of overlapping operations on the same server.
    pub duplicate_policy: Option<DuplicatePolicy>,

    /// Whether opening the panel triggers an immediate refetch.
    pub refetch_on_open: Option<bool>,

    /// Tool choice mode seeded into application state at startup.
    pub initial_tool_choice: Option<ToolChoice>,
}

impl PanelSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            poll_interval_secs: Some(DEFAULT_POLL_INTERVAL_SECS),
            duplicate_policy: Some(DuplicatePolicy::Skip),
            refetch_on_open: Some(true),
            initial_tool_choice: Some(ToolChoice::Auto),
        }
    }

    /// Effective poll interval (with default fallback).
    #[must_use]
    pub const fn effective_poll_interval(&self) -> Duration {
        match self.poll_interval_secs {
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    #[must_use]
    pub fn effective_duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy.unwrap_or_default()
    }

    #[must_use]
    pub fn effective_refetch_on_open(&self) -> bool {
        self.refetch_on_open.unwrap_or(true)
    }

    #[must_use]
    pub fn effective_initial_tool_choice(&self) -> ToolChoice {
        self.initial_tool_choice.unwrap_or_default()
    }

    /// Merge an update into these settings, only touching fields that are Some.
    pub fn merge(&mut self, other: &PanelSettingsUpdate) {
        if let Some(secs) = other.poll_interval_secs {
            self.poll_interval_secs = secs;
        }
        if let Some(policy) = other.duplicate_policy {
            self.duplicate_policy = policy;
        }
        if let Some(refetch) = other.refetch_on_open {
            self.refetch_on_open = refetch;
        }
        if let Some(choice) = other.initial_tool_choice {
            self.initial_tool_choice = choice;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset field to its default
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelSettingsUpdate {
    pub poll_interval_secs: Option<Option<u64>>,
    pub duplicate_policy: Option<Option<DuplicatePolicy>>,
    pub refetch_on_open: Option<Option<bool>>,
    pub initial_tool_choice: Option<Option<ToolChoice>>,
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Poll interval must be between 1 and 86400 seconds, got {0}")]
    InvalidPollInterval(u64),
}

/// Validate settings values.
pub fn validate_settings(settings: &PanelSettings) -> Result<(), SettingsError> {
    if let Some(secs) = settings.poll_interval_secs {
        if !(1..=MAX_POLL_INTERVAL_SECS).contains(&secs) {
            return Err(SettingsError::InvalidPollInterval(secs));
        }
    }

    Ok(())
}

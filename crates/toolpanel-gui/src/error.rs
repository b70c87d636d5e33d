//! Semantic error types for panel operations.
//!
//! These errors are domain-focused, not transport-focused. Adapters map
//! `GuiError` to their own error types (exit codes, HTTP statuses, etc.).

use std::fmt;

use toolpanel_core::{DirectoryError, SettingsError, ToolChoiceParseError};

/// Semantic errors for panel backend queries and configuration.
///
/// Mutating operations never return these; their failures are routed to
/// the notifier and reported through `OperationOutcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiError {
    /// Entity not found (404-ish).
    NotFound {
        /// Type of entity (e.g., "server", "tool").
        entity: &'static str,
        /// Identifier that was not found.
        id: String,
    },

    /// Request validation failed (400-ish).
    ValidationFailed(String),

    /// Operation conflicts with current state (409-ish).
    Conflict(String),

    /// The server directory is temporarily unavailable (503-ish).
    Unavailable(String),

    /// Unexpected internal error.
    Internal(String),
}

impl fmt::Display for GuiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Conflict(msg) => write!(f, "conflict: {msg}"),
            Self::Unavailable(msg) => write!(f, "service unavailable: {msg}"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for GuiError {}

// ============================================================================
// Conversions from core errors
// ============================================================================

impl From<DirectoryError> for GuiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Transport(msg) => Self::Unavailable(msg),
            DirectoryError::NotFound(name) => Self::NotFound {
                entity: "server",
                id: name,
            },
            DirectoryError::DuplicateServer(name) => {
                Self::Conflict(format!("directory listed server twice: {name}"))
            }
            DirectoryError::Backend(msg) => Self::Internal(msg),
        }
    }
}

impl From<SettingsError> for GuiError {
    fn from(err: SettingsError) -> Self {
        Self::ValidationFailed(err.to_string())
    }
}

impl From<ToolChoiceParseError> for GuiError {
    fn from(err: ToolChoiceParseError) -> Self {
        Self::ValidationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_error_mapping() {
        assert_eq!(
            GuiError::from(DirectoryError::NotFound("fs".into())),
            GuiError::NotFound {
                entity: "server",
                id: "fs".into()
            }
        );
        assert!(matches!(
            GuiError::from(DirectoryError::Transport("refused".into())),
            GuiError::Unavailable(_)
        ));
    }

    #[test]
    fn test_display() {
        let err = GuiError::NotFound {
            entity: "tool",
            id: "read_file".into(),
        };
        assert_eq!(err.to_string(), "tool not found: read_file");
    }
}

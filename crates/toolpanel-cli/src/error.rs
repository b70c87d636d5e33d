//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from `GuiError` to exit codes and user-facing messages.

use thiserror::Error;
use toolpanel_gui::GuiError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Panel error with no better category.
    #[error("{0}")]
    Panel(String),

    /// Argument or input error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The server directory could not be reached.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Panel(_) => 1,
            Self::Arguments(_) => 2,   // EX_USAGE
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,         // EX_IOERR
            Self::Config(_) => 78,     // EX_CONFIG
        }
    }
}

impl From<GuiError> for CliError {
    fn from(err: GuiError) -> Self {
        match err {
            GuiError::NotFound { .. } => Self::Arguments(err.to_string()),
            GuiError::ValidationFailed(msg) => Self::Config(msg),
            GuiError::Unavailable(msg) => Self::Unavailable(msg),
            GuiError::Conflict(msg) | GuiError::Internal(msg) => Self::Panel(msg),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Config("bad".into()).exit_code(), 78);
        assert_eq!(CliError::Arguments("bad".into()).exit_code(), 2);
    }

    #[test]
    fn test_gui_error_mapping() {
        let err = CliError::from(GuiError::NotFound {
            entity: "server",
            id: "fs".into(),
        });
        assert_eq!(err.to_string(), "Invalid arguments: server not found: fs");

        let err = CliError::from(GuiError::Unavailable("refused".into()));
        assert_eq!(err.exit_code(), 69);
    }
}

//! User-visible notification channel.
//!
//! Every failure the panel swallows (fetch errors, operation errors) is
//! forwarded here so the user still sees it, typically as a toast.

use serde::{Deserialize, Serialize};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A human-readable message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: NotificationLevel,

    /// Message to display.
    pub message: String,

    /// Server the message is about, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
}

impl Notification {
    /// Error notification not tied to a single server (e.g. a failed poll).
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            server_name: None,
        }
    }

    /// Error notification for a failed operation on one server.
    pub fn server_error(server_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            server_name: Some(server_name.into()),
            ..Self::error(message)
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
            server_name: None,
        }
    }
}

/// Trait for surfacing notifications to the user.
///
/// Implementations must not block; buffer or hand off to the UI thread.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// A notifier that discards everything.
///
/// Suitable for tests and headless contexts where nobody is watching.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl NoopNotifier {
    pub const fn new() -> Self {
        Self
    }
}

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: Notification) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_server_error_carries_name() {
        let n = Notification::server_error("fs", "connection refused");
        assert_eq!(n.level, NotificationLevel::Error);
        assert_eq!(n.server_name.as_deref(), Some("fs"));
        assert_eq!(n.message, "connection refused");
    }

    #[test]
    fn test_noop_notifier_as_trait_object() {
        let notifier: Arc<dyn Notifier> = Arc::new(NoopNotifier::new());
        notifier.notify(Notification::info("ignored"));
    }
}

use std::sync::{Mutex, MutexGuard, PoisonError};

use toolpanel_core::ports::{Notification, Notifier};

/// Notifier that keeps every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn received(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.received.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All notifications so far, oldest first.
    pub fn all(&self) -> Vec<Notification> {
        self.received().clone()
    }

    /// Notifications about one server.
    pub fn for_server(&self, name: &str) -> Vec<Notification> {
        self.received()
            .iter()
            .filter(|n| n.server_name.as_deref() == Some(name))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.received().len()
    }

    pub fn is_empty(&self) -> bool {
        self.received().is_empty()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::error("poll failed"));
        notifier.notify(Notification::server_error("fs", "refused"));

        assert_eq!(notifier.len(), 2);
        assert_eq!(notifier.all()[0].message, "poll failed");
        assert_eq!(notifier.for_server("fs").len(), 1);

        assert_eq!(notifier.drain().len(), 2);
        assert!(notifier.is_empty());
    }
}

//! Notifier that hands notifications to the terminal loop.

use tokio::sync::mpsc;
use toolpanel_core::ports::{Notification, Notifier};

/// Forwards notifications over an unbounded channel so `notify` never blocks.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Receiver gone means the session is ending.
        let _ = self.tx.send(notification);
    }
}

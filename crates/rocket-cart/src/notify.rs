//! # Notification Sink
//!
//! Fire-and-forget delivery of [`Notice`]s to whatever shows them.
//!
//! The sink is a pure consumer: the engine decides the outcome first and
//! only then hands over the notice. Nothing a sink does can change the cart.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use rocket_core::Notice;

/// Receives user-visible notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

impl<F> Notifier for F
where
    F: Fn(&Notice) + Send + Sync,
{
    fn notify(&self, notice: &Notice) {
        self(notice)
    }
}

/// Logs notices. Default sink for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        warn!(kind = ?notice.kind, "{}", notice.message);
    }
}

/// Forwards notices into a channel drained by a UI event loop.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Creates the notifier and the receiving end for the UI.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelNotifier { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: &Notice) {
        if self.tx.send(*notice).is_err() {
            debug!(kind = ?notice.kind, "Notice dropped, no receiver");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket_core::{CartOperation, NoticeKind};
    use std::sync::Mutex;

    #[test]
    fn test_channel_notifier_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();

        notifier.notify(&Notice::out_of_stock());
        notifier.notify(&Notice::failed(CartOperation::Remove));

        assert_eq!(rx.try_recv().unwrap().kind, NoticeKind::OutOfStock);
        assert_eq!(rx.try_recv().unwrap().kind, NoticeKind::RemoveFailed);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_notifier_without_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);

        notifier.notify(&Notice::out_of_stock());
    }

    #[test]
    fn test_closure_notifier() {
        let seen = Mutex::new(Vec::new());
        let notifier = |notice: &Notice| seen.lock().unwrap().push(notice.message);

        notifier.notify(&Notice::failed(CartOperation::Add));

        assert_eq!(*seen.lock().unwrap(), vec!["error adding product"]);
    }
}

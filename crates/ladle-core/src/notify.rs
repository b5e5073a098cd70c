// ── Notification sink ──
//
// The presentation layer's toast surface, injected as a capability so
// the core never touches a rendering environment. Canceled and stale
// outcomes never reach this sink.

use tracing::{error, info};

/// Outcome class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A sink for user-facing outcome messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotificationKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationKind::Error, message);
    }
}

/// Notifier that routes messages to the `tracing` log stream.
///
/// A reasonable default for embeddings without a toast surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => info!(message, "operation succeeded"),
            NotificationKind::Error => error!(message, "operation failed"),
        }
    }
}

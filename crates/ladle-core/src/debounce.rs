// ── Trailing-edge search debounce ──
//
// Commits a raw input value only once it has sat unchanged for the
// quiet period. A newer input cancels the pending commit's timer
// outright rather than letting it fire and lose a race.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Debounces raw search input into a committed query.
///
/// [`input`](Self::input) records the raw value immediately; the
/// committed value follows after the quiet period, collapsing each
/// burst of inputs to its final value. Committed values are published
/// through a `watch` channel. Must be used within a Tokio runtime.
pub struct SearchDebouncer {
    quiet: Duration,
    raw: Mutex<String>,
    pending: Mutex<Option<CancellationToken>>,
    committed: Arc<watch::Sender<String>>,
}

impl SearchDebouncer {
    pub fn new(quiet: Duration) -> Self {
        let (committed, _) = watch::channel(String::new());
        Self {
            quiet,
            raw: Mutex::new(String::new()),
            pending: Mutex::new(None),
            committed: Arc::new(committed),
        }
    }

    /// Record a raw input value and schedule its commit after the
    /// quiet period, superseding any commit still pending.
    pub fn input(&self, value: impl Into<String>) {
        let value = value.into();
        *self.raw.lock().expect("raw value lock poisoned") = value.clone();

        let token = CancellationToken::new();
        let previous = self
            .pending
            .lock()
            .expect("pending commit lock poisoned")
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let committed = Arc::clone(&self.committed);
        let quiet = self.quiet;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = tokio::time::sleep(quiet) => {
                    committed.send_replace(value);
                }
            }
        });
    }

    /// The raw (uncommitted) input value.
    pub fn raw(&self) -> String {
        self.raw.lock().expect("raw value lock poisoned").clone()
    }

    /// The committed query value.
    pub fn committed(&self) -> String {
        self.committed.borrow().clone()
    }

    /// Subscribe to committed query changes.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.committed.subscribe()
    }
}

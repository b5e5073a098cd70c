// ── Mutation request lifecycle ──
//
// One operation slot per mutation kind. Submitting while a slot is
// occupied supersedes: the prior token is canceled synchronously,
// before the new operation starts -- never queued behind it. Busy
// flags are published through a `watch` channel so a presentation
// layer can disable controls without polling.

use std::future::Future;
use std::sync::{Arc, Mutex};

use ladle_api::Acknowledged;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::CoreError;
use crate::notify::Notifier;
use crate::retry::{self, RetryPolicy};

/// The three retryable mutation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// Busy flags for every request the controller issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub list: bool,
    pub detail: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl LoadingFlags {
    /// Busy flag for a mutation kind.
    pub fn mutation(&self, kind: MutationKind) -> bool {
        match kind {
            MutationKind::Create => self.create,
            MutationKind::Update => self.update,
            MutationKind::Delete => self.delete,
        }
    }

    fn set_mutation(&mut self, kind: MutationKind, busy: bool) {
        match kind {
            MutationKind::Create => self.create = busy,
            MutationKind::Update => self.update = busy,
            MutationKind::Delete => self.delete = busy,
        }
    }
}

/// Live cancellation tokens, at most one per mutation kind.
#[derive(Default)]
struct Slots {
    create: Option<CancellationToken>,
    update: Option<CancellationToken>,
    delete: Option<CancellationToken>,
}

impl Slots {
    fn slot_mut(&mut self, kind: MutationKind) -> &mut Option<CancellationToken> {
        match kind {
            MutationKind::Create => &mut self.create,
            MutationKind::Update => &mut self.update,
            MutationKind::Delete => &mut self.delete,
        }
    }
}

/// Per-kind lifecycle controller for retryable mutations.
pub struct RequestLifecycleManager {
    slots: Mutex<Slots>,
    policy: RetryPolicy,
    loading: Arc<watch::Sender<LoadingFlags>>,
    notifier: Arc<dyn Notifier>,
}

impl RequestLifecycleManager {
    pub fn new(
        policy: RetryPolicy,
        loading: Arc<watch::Sender<LoadingFlags>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            slots: Mutex::new(Slots::default()),
            policy,
            loading,
            notifier,
        }
    }

    /// Submit a mutation of `kind`, superseding any in-flight one.
    ///
    /// `operation` is invoked once per retry attempt with the slot's
    /// token. Success is notified with the service-supplied message and
    /// returns the payload; a non-cancellation failure is notified and
    /// returned; a canceled outcome is returned without side effects.
    pub async fn submit<T, F, Fut>(&self, kind: MutationKind, operation: F) -> Result<T, CoreError>
    where
        T: Acknowledged,
        F: Fn(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let token = self.arm(kind);

        let result = retry::with_retry(&self.policy, &token, || operation(token.clone())).await;

        // A superseded completion must not reset state now owned by the
        // newer request; an uncanceled token is necessarily still current.
        if !token.is_cancelled() {
            self.release(kind);
        }

        match result {
            Ok(payload) => {
                self.notifier.success(payload.message());
                Ok(payload)
            }
            Err(e) if e.is_canceled() => Err(e),
            Err(e) => {
                self.notifier.error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Abort the in-flight mutation of `kind`, if any.
    ///
    /// The busy flag clears immediately -- the UI must read "not busy"
    /// without waiting for the rejected future to unwind.
    pub fn cancel(&self, kind: MutationKind) {
        let mut slots = self.slots.lock().expect("slot map lock poisoned");
        if let Some(token) = slots.slot_mut(kind).take() {
            debug!(?kind, "canceling in-flight mutation");
            token.cancel();
        }
        drop(slots);
        self.set_flag(kind, false);
    }

    /// Whether a mutation of `kind` is currently in flight.
    pub fn in_flight(&self, kind: MutationKind) -> bool {
        self.loading.borrow().mutation(kind)
    }

    /// Subscribe to busy-flag transitions.
    pub fn loading(&self) -> watch::Receiver<LoadingFlags> {
        self.loading.subscribe()
    }

    // ── Slot management ──────────────────────────────────────────────

    /// Cancel the previous token for `kind` (if any), install a fresh
    /// one, and mark the kind busy.
    fn arm(&self, kind: MutationKind) -> CancellationToken {
        let token = CancellationToken::new();
        let mut slots = self.slots.lock().expect("slot map lock poisoned");
        if let Some(previous) = slots.slot_mut(kind).replace(token.clone()) {
            debug!(?kind, "superseding in-flight mutation");
            previous.cancel();
        }
        drop(slots);
        self.set_flag(kind, true);
        token
    }

    /// Clear the slot and busy flag after a current (non-superseded)
    /// completion.
    fn release(&self, kind: MutationKind) {
        let mut slots = self.slots.lock().expect("slot map lock poisoned");
        *slots.slot_mut(kind) = None;
        drop(slots);
        self.set_flag(kind, false);
    }

    fn set_flag(&self, kind: MutationKind, busy: bool) {
        self.loading.send_modify(|flags| flags.set_mutation(kind, busy));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::cancel::with_cancellation;
    use crate::notify::NotificationKind;

    struct Ack(String);

    impl Acknowledged for Ack {
        fn message(&self) -> &str {
            &self.0
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<(NotificationKind, String)>>,
    }

    impl RecordingNotifier {
        fn events(&self) -> Vec<(NotificationKind, String)> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, kind: NotificationKind, message: &str) {
            self.events.lock().unwrap().push((kind, message.to_string()));
        }
    }

    fn manager(policy: RetryPolicy) -> (Arc<RequestLifecycleManager>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let (loading, _) = watch::channel(LoadingFlags::default());
        let manager = RequestLifecycleManager::new(
            policy,
            Arc::new(loading),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        );
        (Arc::new(manager), notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn success_notifies_the_service_message() {
        let (manager, notifier) = manager(RetryPolicy::default());

        let result = manager
            .submit(MutationKind::Create, |_token| async {
                Ok(Ack("Recipe created".into()))
            })
            .await;

        assert_eq!(result.unwrap().0, "Recipe created");
        assert!(!manager.in_flight(MutationKind::Create));
        assert_eq!(
            notifier.events(),
            vec![(NotificationKind::Success, "Recipe created".into())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn supersede_cancels_the_prior_submission() {
        let (manager, notifier) = manager(RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_millis(10),
        });

        let slow = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                manager
                    .submit(MutationKind::Create, |token| async move {
                        with_cancellation(&token, async {
                            tokio::time::sleep(Duration::from_millis(1000)).await;
                            Ok::<_, CoreError>(Ack("first".into()))
                        })
                        .await
                    })
                    .await
            })
        };

        // Let the first submission arm its slot before superseding it.
        tokio::task::yield_now().await;
        assert!(manager.in_flight(MutationKind::Create));

        let second = manager
            .submit(MutationKind::Create, |token| async move {
                with_cancellation(&token, async {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Ok::<_, CoreError>(Ack("second".into()))
                })
                .await
            })
            .await;

        assert_eq!(second.unwrap().0, "second");
        assert!(matches!(slow.await.unwrap(), Err(CoreError::Canceled)));
        assert!(!manager.in_flight(MutationKind::Create));

        // Only the surviving submission produced a notification.
        assert_eq!(
            notifier.events(),
            vec![(NotificationKind::Success, "second".into())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_clears_the_busy_flag_before_the_future_settles() {
        let (manager, notifier) = manager(RetryPolicy::default());

        let pending = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                manager
                    .submit(MutationKind::Delete, |token| async move {
                        with_cancellation(&token, async {
                            tokio::time::sleep(Duration::from_millis(5000)).await;
                            Ok::<_, CoreError>(Ack("too late".into()))
                        })
                        .await
                    })
                    .await
            })
        };

        tokio::task::yield_now().await;
        assert!(manager.in_flight(MutationKind::Delete));

        manager.cancel(MutationKind::Delete);
        assert!(!manager.in_flight(MutationKind::Delete));

        assert!(matches!(pending.await.unwrap(), Err(CoreError::Canceled)));
        assert!(notifier.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_notifies_after_the_budget_is_exhausted() {
        let (manager, notifier) = manager(RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(50),
        });
        let calls = AtomicU32::new(0);

        let result = manager
            .submit(MutationKind::Update, |_token| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err::<Ack, _>(CoreError::Api {
                        message: "kitchen on fire".into(),
                        status: Some(500),
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!manager.in_flight(MutationKind::Update));
        assert_eq!(
            notifier.events(),
            vec![(NotificationKind::Error, "kitchen on fire".into())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn kinds_do_not_interfere() {
        let (manager, _) = manager(RetryPolicy::default());

        let pending = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                manager
                    .submit(MutationKind::Create, |token| async move {
                        with_cancellation(&token, async {
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            Ok::<_, CoreError>(Ack("created".into()))
                        })
                        .await
                    })
                    .await
            })
        };

        tokio::task::yield_now().await;

        // A delete does not supersede the in-flight create.
        let deleted = manager
            .submit(MutationKind::Delete, |_token| async {
                Ok(Ack("deleted".into()))
            })
            .await;

        assert_eq!(deleted.unwrap().0, "deleted");
        assert_eq!(pending.await.unwrap().unwrap().0, "created");
    }
}

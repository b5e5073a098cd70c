// ── Retry with exponential backoff ──
//
// Pure policy plus a driver for retryable mutations. Backoff doubles
// per attempt with no jitter. Cancellation aborts both the attempts
// and the delay between them.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Backoff parameters for retryable mutations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt budget, first try included.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each attempt after.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay after the (0-indexed) failed attempt: `base * 2^attempt`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Drive `attempt_fn` under `policy`.
///
/// A `Canceled` failure (or an already-aborted token) stops the loop
/// immediately -- no further attempts, no delay. Any other failure is
/// retried until the budget is exhausted, sleeping `base * 2^attempt`
/// between attempts; the sleep itself races the token. The last
/// attempt's error is propagated unchanged.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    token: &CancellationToken,
    mut attempt_fn: F,
) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let mut last_error = None;

    for attempt in 0..policy.max_attempts {
        if token.is_cancelled() {
            return Err(CoreError::Canceled);
        }

        match attempt_fn().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_canceled() => return Err(e),
            Err(e) => {
                debug!(attempt, error = %e, "attempt failed");
                last_error = Some(e);

                if attempt + 1 < policy.max_attempts {
                    let delay = policy.delay_after(attempt);
                    tokio::select! {
                        biased;
                        () = token.cancelled() => return Err(CoreError::Canceled),
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    let err = last_error.unwrap_or_else(|| CoreError::Internal("empty retry budget".into()));
    warn!(error = %err, "retry budget exhausted");
    Err(err)
}

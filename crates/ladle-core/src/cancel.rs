// ── Cancellation-aware execution ──
//
// One async unit of work raced against its cancellation token. Every
// suspension point in the crate (request futures, retry backoff,
// debounce timers) goes through this race or an equivalent select, so
// an abort is observed without waiting for the work to settle.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::CoreError;

/// Run `operation` until it settles or `token` is canceled, whichever
/// comes first.
///
/// An abort wins the race and yields [`CoreError::Canceled`]; the
/// in-flight future is dropped at that point.
pub async fn with_cancellation<T, E, F>(
    token: &CancellationToken,
    operation: F,
) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<CoreError>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => Err(CoreError::Canceled),
        result = operation => result.map_err(Into::into),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn passes_through_success() {
        let token = CancellationToken::new();
        let result = with_cancellation(&token, async { Ok::<_, CoreError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn converts_transport_errors() {
        let token = CancellationToken::new();
        let result: Result<(), CoreError> = with_cancellation(&token, async {
            Err(ladle_api::Error::Api {
                status: 500,
                message: None,
            })
        })
        .await;

        assert!(matches!(result, Err(CoreError::Api { status: Some(500), .. })));
    }

    #[tokio::test]
    async fn aborted_token_wins_the_race() {
        let token = CancellationToken::new();
        token.cancel();

        let result = with_cancellation(&token, async { Ok::<_, CoreError>(7) }).await;
        assert!(matches!(result, Err(CoreError::Canceled)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_inflight_work() {
        let token = CancellationToken::new();
        let start = tokio::time::Instant::now();

        let canceler = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                token.cancel();
            })
        };

        let result: Result<(), CoreError> = with_cancellation(&token, async {
            tokio::time::sleep(Duration::from_millis(5000)).await;
            Ok::<(), CoreError>(())
        })
        .await;

        canceler.await.unwrap();
        assert!(matches!(result, Err(CoreError::Canceled)));
        assert_eq!(start.elapsed(), Duration::from_millis(50));
    }
}

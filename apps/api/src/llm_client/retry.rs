//! Bounded retry for the chat API, acting on exactly one condition: the
//! explicit rate-limit signal. Every other error propagates untouched.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::LlmError;

/// Total attempts, including the first.
pub const MAX_ATTEMPTS: u32 = 3;
/// Fixed wait between attempts. No backoff, no jitter.
pub const RATE_LIMIT_WAIT: Duration = Duration::from_secs(20);

/// Runs `op` up to `max_attempts` times, sleeping `wait` after each
/// rate-limited attempt. A non-rate-limit error returns immediately.
/// Exhausting all attempts returns `LlmError::RateLimited`.
///
/// No wait is performed after the final failed attempt.
pub async fn with_rate_limit_retry<T, F, Fut>(
    max_attempts: u32,
    wait: Duration,
    mut op: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    for attempt in 1..=max_attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_rate_limit() => {
                if attempt == max_attempts {
                    break;
                }
                warn!(
                    "Rate limited (attempt {attempt}/{max_attempts}), retrying in {}s...",
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;
            }
            Err(e) => return Err(e),
        }
    }

    Err(LlmError::RateLimited {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn rate_limited() -> LlmError {
        LlmError::Api {
            status: 429,
            message: "rate limited".into(),
        }
    }

    /// Fails with a rate-limit error `failures` times, then succeeds.
    struct Script {
        calls: AtomicU32,
        failures: u32,
    }

    impl Script {
        fn new(failures: u32) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures,
            }
        }

        async fn run(&self) -> Result<&'static str, LlmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(rate_limited())
            } else {
                Ok("ok")
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_two_rate_limits_and_two_waits() {
        let script = Script::new(2);
        let started = Instant::now();

        let result =
            with_rate_limit_retry(MAX_ATTEMPTS, RATE_LIMIT_WAIT, || script.run()).await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(script.calls(), 3);
        // exactly two waits of 20s each
        assert_eq!(started.elapsed(), RATE_LIMIT_WAIT * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_three_rate_limits() {
        let script = Script::new(3);
        let started = Instant::now();

        let result =
            with_rate_limit_retry(MAX_ATTEMPTS, RATE_LIMIT_WAIT, || script.run()).await;

        assert!(matches!(result, Err(LlmError::RateLimited { attempts: 3 })));
        assert_eq!(script.calls(), 3);
        // no wait after the final failed attempt
        assert_eq!(started.elapsed(), RATE_LIMIT_WAIT * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn non_rate_limit_error_propagates_immediately() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = with_rate_limit_retry(MAX_ATTEMPTS, RATE_LIMIT_WAIT, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(LlmError::EmptyContent) }
        })
        .await;

        assert!(matches!(result, Err(LlmError::EmptyContent)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}

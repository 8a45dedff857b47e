//! Bounded retry loop for rate-limited upstream calls.

use crate::{RetryPolicy, Sleeper, TokioSleeper};
use signbridge_error::{GenerationError, GenerationErrorKind, RetryableError};
use std::future::Future;
use tracing::{debug, error, instrument, warn};

/// Retries an upstream call while it is rate limited.
///
/// The controller holds no per-call state: each [`send_with_retry`] owns its
/// own attempt counter, so one controller can serve any number of concurrent
/// requests without locking.
///
/// # Example
///
/// ```rust,ignore
/// let controller = RetryController::new(RetryPolicy::default());
/// let response = controller
///     .send_with_retry(|| client.call(&payload))
///     .await?;
/// ```
///
/// [`send_with_retry`]: RetryController::send_with_retry
#[derive(Debug, Clone)]
pub struct RetryController<S = TokioSleeper> {
    policy: RetryPolicy,
    sleeper: S,
}

impl RetryController<TokioSleeper> {
    /// Create a controller that waits on the Tokio timer.
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_sleeper(policy, TokioSleeper)
    }
}

impl<S: Sleeper> RetryController<S> {
    /// Create a controller with a custom wait primitive.
    pub fn with_sleeper(policy: RetryPolicy, sleeper: S) -> Self {
        Self { policy, sleeper }
    }

    /// Get the retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Get the wait primitive.
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Execute `operation` until it succeeds, fails permanently, or the
    /// attempt budget runs out.
    ///
    /// - `Ok` short-circuits and is returned immediately
    /// - A retryable (429) error waits `policy.delay_for(attempt)` and tries again
    /// - Any other error is returned without further attempts
    /// - When every attempt was rate limited, returns `RateLimitExhausted`
    ///
    /// Dropping the returned future cancels any wait in progress.
    #[instrument(
        skip_all,
        fields(max_retries = *self.policy.max_retries(), backoff_base = *self.policy.backoff_base())
    )]
    pub async fn send_with_retry<F, Fut, T>(&self, operation: F) -> Result<T, GenerationError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, GenerationError>>,
    {
        let max_retries = *self.policy.max_retries();

        for attempt in 0..max_retries {
            debug!(attempt, "Calling upstream");

            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempt, "Upstream call succeeded after rate limiting");
                    }
                    return Ok(value);
                }
                Err(e) if e.is_retryable() => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Upstream rate limited, backing off"
                    );
                    self.sleeper.sleep(delay).await;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Permanent upstream error, failing immediately");
                    return Err(e);
                }
            }
        }

        error!(attempts = max_retries, "Upstream rate limit not lifted within retry budget");
        Err(GenerationError::new(GenerationErrorKind::RateLimitExhausted {
            attempts: max_retries,
        }))
    }
}

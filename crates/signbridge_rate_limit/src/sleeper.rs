//! Wait primitive used between retry attempts.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the current call for a duration.
///
/// Implementations must only suspend the calling task, never the thread, so
/// concurrent requests keep making progress while one of them backs off.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

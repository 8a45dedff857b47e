//! Rate-limit aware retry for upstream calls.
//!
//! Upstream APIs signal quota exhaustion with HTTP 429. This crate wraps a
//! single upstream call in a bounded retry loop:
//!
//! - Only rate-limit errors (see [`RetryableError`]) are retried
//! - Attempt `i` waits `backoff_base ^ i` time units before the next attempt
//! - After `max_retries` rate-limited attempts the call fails with
//!   `RateLimitExhausted`
//!
//! The wait is performed through the [`Sleeper`] trait so tests can drive the
//! controller with a recording clock instead of real time.
//!
//! ```rust,no_run
//! use signbridge_rate_limit::{RetryController, RetryPolicy};
//! use signbridge_error::GenerationError;
//!
//! # async fn call_upstream() -> Result<String, GenerationError> { Ok(String::new()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), GenerationError> {
//! let controller = RetryController::new(RetryPolicy::new(3, 1.5)?);
//! let text = controller.send_with_retry(|| call_upstream()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`RetryableError`]: signbridge_error::RetryableError

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod controller;
mod policy;
mod sleeper;

pub use controller::RetryController;
pub use policy::{RetryPolicy, RetryPolicySettings};
pub use sleeper::{Sleeper, TokioSleeper};

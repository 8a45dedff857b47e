//! Retry budget and backoff schedule.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use signbridge_error::{GenerationError, GenerationErrorKind};
use std::time::Duration;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_BASE: f64 = 1.5;
const DEFAULT_BACKOFF_UNIT_MS: u64 = 1000;

/// Validated retry budget and exponential backoff schedule.
///
/// The wait after rate-limited attempt `i` (counting from 0) is
/// `backoff_unit * backoff_base ^ i`. With the defaults (3 attempts, base 1.5,
/// one-second unit) the waits are 1s, 1.5s and 2.25s.
///
/// # Example
///
/// ```
/// use signbridge_rate_limit::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(3, 2.0).unwrap();
/// assert_eq!(policy.delay_for(0), Duration::from_secs(1));
/// assert_eq!(policy.delay_for(2), Duration::from_secs(4));
/// assert!(RetryPolicy::new(0, 2.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Getters, Serialize, Deserialize)]
#[serde(try_from = "RetryPolicySettings", into = "RetryPolicySettings")]
pub struct RetryPolicy {
    /// Total attempts allowed per call, including the first
    max_retries: u32,
    /// Multiplicative growth factor of the wait between attempts
    backoff_base: f64,
    /// Duration of one backoff time unit
    backoff_unit: Duration,
}

impl RetryPolicy {
    /// Create a policy with a one-second backoff unit.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRetryPolicy` if `max_retries` is zero or `backoff_base`
    /// is not a finite number of at least 1.0.
    pub fn new(max_retries: u32, backoff_base: f64) -> Result<Self, GenerationError> {
        Self::with_unit(
            max_retries,
            backoff_base,
            Duration::from_millis(DEFAULT_BACKOFF_UNIT_MS),
        )
    }

    /// Create a policy with an explicit backoff unit.
    ///
    /// # Errors
    ///
    /// Same conditions as [`RetryPolicy::new`].
    pub fn with_unit(
        max_retries: u32,
        backoff_base: f64,
        backoff_unit: Duration,
    ) -> Result<Self, GenerationError> {
        if max_retries == 0 {
            return Err(GenerationError::new(GenerationErrorKind::InvalidRetryPolicy(
                "max_retries must be at least 1".to_string(),
            )));
        }
        if !backoff_base.is_finite() || backoff_base < 1.0 {
            return Err(GenerationError::new(GenerationErrorKind::InvalidRetryPolicy(
                format!("backoff_base must be a finite number >= 1.0, got {}", backoff_base),
            )));
        }

        Ok(Self {
            max_retries,
            backoff_base,
            backoff_unit,
        })
    }

    /// Wait to apply after the rate-limited attempt with index `attempt`.
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.backoff_unit.as_secs_f64() * self.backoff_base.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Total time spent waiting when every attempt is rate limited.
    pub fn worst_case_wait(&self) -> Duration {
        (0..self.max_retries)
            .map(|i| self.delay_for(i))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            backoff_unit: Duration::from_millis(DEFAULT_BACKOFF_UNIT_MS),
        }
    }
}

/// Unvalidated retry settings as they appear in configuration files.
///
/// ```toml
/// [retry]
/// max_retries = 3
/// backoff_base = 1.5
/// backoff_unit_ms = 1000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicySettings {
    /// Total attempts allowed per call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff growth factor
    #[serde(default = "default_backoff_base")]
    pub backoff_base: f64,
    /// Backoff unit in milliseconds
    #[serde(default = "default_backoff_unit_ms")]
    pub backoff_unit_ms: u64,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_backoff_base() -> f64 {
    DEFAULT_BACKOFF_BASE
}

fn default_backoff_unit_ms() -> u64 {
    DEFAULT_BACKOFF_UNIT_MS
}

impl TryFrom<RetryPolicySettings> for RetryPolicy {
    type Error = GenerationError;

    fn try_from(settings: RetryPolicySettings) -> Result<Self, Self::Error> {
        Self::with_unit(
            settings.max_retries,
            settings.backoff_base,
            Duration::from_millis(settings.backoff_unit_ms),
        )
    }
}

impl From<RetryPolicy> for RetryPolicySettings {
    fn from(policy: RetryPolicy) -> Self {
        Self {
            max_retries: policy.max_retries,
            backoff_base: policy.backoff_base,
            backoff_unit_ms: u64::try_from(policy.backoff_unit.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

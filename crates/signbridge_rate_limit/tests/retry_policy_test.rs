//! Tests for loading retry policies from configuration values.

use signbridge_rate_limit::{RetryPolicy, RetryPolicySettings};
use std::time::Duration;

#[test]
fn test_policy_from_settings() {
    let policy: RetryPolicy = serde_json::from_str(
        r#"{"max_retries": 4, "backoff_base": 2.0, "backoff_unit_ms": 500}"#,
    )
    .unwrap();

    assert_eq!(*policy.max_retries(), 4);
    assert_eq!(*policy.backoff_base(), 2.0);
    assert_eq!(policy.delay_for(0), Duration::from_millis(500));
    assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
}

#[test]
fn test_missing_fields_use_defaults() {
    let policy: RetryPolicy = serde_json::from_str("{}").unwrap();
    assert_eq!(policy, RetryPolicy::default());
}

#[test]
fn test_zero_attempts_rejected_at_load() {
    let result: Result<RetryPolicy, _> = serde_json::from_str(r#"{"max_retries": 0}"#);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("max_retries must be at least 1"));
}

#[test]
fn test_settings_round_trip_preserves_unit() {
    let policy = RetryPolicy::with_unit(2, 3.0, Duration::from_millis(20)).unwrap();
    let settings = RetryPolicySettings::from(policy);
    assert_eq!(settings.backoff_unit_ms, 20);
    assert_eq!(RetryPolicy::try_from(settings).unwrap(), policy);
}

//! OpenTelemetry instruments for upstream generation calls.
//!
//! Instruments are created on the global meter the first time they are used.
//! With no meter provider installed they are no-ops.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use signbridge_error::GenerationErrorKind;
use std::sync::OnceLock;

static METRICS: OnceLock<UpstreamMetrics> = OnceLock::new();

/// Counters and latency histogram for calls to the sentence generation API.
#[derive(Clone)]
pub struct UpstreamMetrics {
    _meter: Meter,
    /// Upstream round trips attempted
    pub requests: Counter<u64>,
    /// Round trips answered with 429
    pub rate_limited: Counter<u64>,
    /// Round trips that failed for any other reason
    pub errors: Counter<u64>,
    /// Round trip duration in seconds
    pub duration: Histogram<f64>,
    /// Tokens billed, as reported by the API
    pub tokens: Counter<u64>,
}

impl UpstreamMetrics {
    fn init() -> Self {
        let meter = global::meter("signbridge_upstream");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("upstream.requests")
                .with_description("Upstream generateContent round trips")
                .build(),
            rate_limited: meter
                .u64_counter("upstream.rate_limited")
                .with_description("Upstream replies with status 429")
                .build(),
            errors: meter
                .u64_counter("upstream.errors")
                .with_description("Failed upstream round trips other than 429")
                .build(),
            duration: meter
                .f64_histogram("upstream.duration")
                .with_unit("seconds")
                .with_description("Upstream round trip duration")
                .build(),
            tokens: meter
                .u64_counter("upstream.tokens")
                .with_description("Total tokens reported by the upstream API")
                .build(),
        }
    }

    /// Global instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record one completed round trip, successful or not.
    pub fn record_request(&self, model: &str, duration_secs: f64) {
        let labels = &[KeyValue::new("model", model.to_string())];
        self.requests.add(1, labels);
        self.duration.record(duration_secs, labels);
    }

    /// Record a failed round trip under its error class.
    pub fn record_error(&self, model: &str, kind: &GenerationErrorKind) {
        if kind.is_retryable() {
            self.rate_limited
                .add(1, &[KeyValue::new("model", model.to_string())]);
            return;
        }
        let labels = &[
            KeyValue::new("model", model.to_string()),
            KeyValue::new("error_type", error_type(kind)),
        ];
        self.errors.add(1, labels);
    }

    /// Record token usage from a successful reply.
    pub fn record_tokens(&self, model: &str, total_tokens: u32) {
        self.tokens
            .add(u64::from(total_tokens), &[KeyValue::new("model", model.to_string())]);
    }
}

/// Metric label for an error kind.
fn error_type(kind: &GenerationErrorKind) -> &'static str {
    match kind {
        GenerationErrorKind::Transport(_) => "network",
        GenerationErrorKind::Upstream { status_code, .. } => match status_code {
            401 | 403 => "auth",
            429 => "rate_limit",
            400..=499 => "invalid_request",
            _ => "server",
        },
        GenerationErrorKind::ResponseShape(_) => "response_shape",
        _ => "unknown",
    }
}

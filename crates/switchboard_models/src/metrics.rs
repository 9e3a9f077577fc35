//! Metrics for vendor calls.
//!
//! OpenTelemetry instruments for requests, failures by classified kind,
//! latency, token usage and retry waits. With no global meter provider
//! installed these are no-ops.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::OnceLock;
use std::time::Duration;
use switchboard_error::FailureKind;

static METRICS: OnceLock<LlmMetrics> = OnceLock::new();

/// Metrics for vendor interactions, labeled by provider and model.
#[derive(Clone)]
pub struct LlmMetrics {
    _meter: Meter,
    /// Successful vendor calls
    pub requests: Counter<u64>,
    /// Failed vendor calls, labeled with the failure kind
    pub errors: Counter<u64>,
    /// Vendor call duration in seconds
    pub duration: Histogram<f64>,
    /// Total tokens reported by vendors
    pub tokens_used: Counter<u64>,
    /// Retry waits taken after rate limits
    pub retries: Counter<u64>,
}

impl LlmMetrics {
    fn init() -> Self {
        let meter = global::meter("switchboard_llm");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("llm.requests")
                .with_description("Successful vendor calls")
                .build(),
            errors: meter
                .u64_counter("llm.errors")
                .with_description("Failed vendor calls")
                .build(),
            duration: meter
                .f64_histogram("llm.duration")
                .with_unit("seconds")
                .with_description("Vendor call duration")
                .build(),
            tokens_used: meter
                .u64_counter("llm.tokens")
                .with_description("Total tokens reported by vendors")
                .build(),
            retries: meter
                .u64_counter("llm.retries")
                .with_description("Retry waits after rate limits")
                .build(),
        }
    }

    /// Get the global instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a successful call.
    pub fn record_request(&self, provider: &str, model: &str, duration: Duration) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
        ];
        self.requests.add(1, labels);
        self.duration.record(duration.as_secs_f64(), labels);
    }

    /// Record a failed call.
    pub fn record_error(&self, provider: &str, model: &str, kind: FailureKind) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
            KeyValue::new("error_type", kind.to_string()),
        ];
        self.errors.add(1, labels);
    }

    /// Record vendor-reported token usage.
    pub fn record_tokens(&self, provider: &str, model: &str, total_tokens: u64) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
        ];
        self.tokens_used.add(total_tokens, labels);
    }

    /// Record a retry wait.
    pub fn record_retry(&self, provider: &str, model: &str) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
        ];
        self.retries.add(1, labels);
    }
}

impl Default for LlmMetrics {
    fn default() -> Self {
        Self::get().clone()
    }
}

impl std::fmt::Debug for LlmMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmMetrics").finish_non_exhaustive()
    }
}

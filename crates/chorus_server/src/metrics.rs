//! Metrics for generation requests.
//!
//! With the `metrics` feature the instruments report through the global
//! OpenTelemetry meter provider; without it every method is a no-op.

#[cfg(feature = "metrics")]
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
#[cfg(feature = "metrics")]
use tracing::debug;

/// Request-level and per-model generation metrics.
#[cfg(feature = "metrics")]
#[derive(Clone)]
pub struct GenerationMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Requests handled, labelled by outcome
    pub requests: Counter<u64>,
    /// Models whose invocation failed inside a request
    pub model_failures: Counter<u64>,
    /// End-to-end request duration in seconds
    pub duration: Histogram<f64>,
}

#[cfg(feature = "metrics")]
impl std::fmt::Debug for GenerationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationMetrics").finish_non_exhaustive()
    }
}

#[cfg(feature = "metrics")]
impl GenerationMetrics {
    /// Create new generation metrics.
    pub fn new() -> Self {
        let meter = global::meter("chorus_generation");
        debug!("Building generation metrics instruments");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("generation.requests")
                .with_description("Generation requests handled")
                .build(),
            model_failures: meter
                .u64_counter("generation.model_failures")
                .with_description("Per-model invocation failures")
                .build(),
            duration: meter
                .f64_histogram("generation.duration")
                .with_unit("seconds")
                .with_description("Generation request duration")
                .build(),
        }
    }

    /// Record a finished request.
    pub fn record_request(&self, outcome: &'static str, duration_secs: f64) {
        let labels = &[KeyValue::new("outcome", outcome)];
        self.requests.add(1, labels);
        self.duration.record(duration_secs, labels);
    }

    /// Record one model failing inside a request.
    pub fn record_model_failure(&self, model: &str) {
        let labels = &[KeyValue::new("model", model.to_string())];
        self.model_failures.add(1, labels);
    }
}

/// Request-level and per-model generation metrics.
///
/// Built without the `metrics` feature; records nothing.
#[cfg(not(feature = "metrics"))]
#[derive(Debug, Clone, Copy)]
pub struct GenerationMetrics;

#[cfg(not(feature = "metrics"))]
impl GenerationMetrics {
    /// Create new generation metrics.
    pub fn new() -> Self {
        Self
    }

    /// Record a finished request.
    pub fn record_request(&self, _outcome: &'static str, _duration_secs: f64) {}

    /// Record one model failing inside a request.
    pub fn record_model_failure(&self, _model: &str) {}
}

impl Default for GenerationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

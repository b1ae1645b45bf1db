//! Prometheus metrics definitions for perfindex
//!
//! All metrics use the `perfindex_` prefix.

use prometheus::{
    CounterVec, Gauge, Histogram, HistogramOpts, HistogramTimer, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Outcome label values for `perfindex_predictions_total`
pub mod outcome {
    pub const SUCCESS: &str = "success";
    pub const INVALID: &str = "invalid";
    pub const MODEL_MISSING: &str = "model_missing";
    pub const ERROR: &str = "error";

    pub const ALL: [&str; 4] = [SUCCESS, INVALID, MODEL_MISSING, ERROR];
}

/// Operation label values for `perfindex_record_mutations_total`
pub mod operation {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";

    pub const ALL: [&str; 3] = [CREATE, UPDATE, DELETE];
}

/// Prometheus metrics for the prediction service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Prediction requests by outcome
    pub predictions_total: CounterVec,
    /// Time spent validating and predicting
    pub prediction_latency_seconds: Histogram,
    /// Record writes by operation
    pub record_mutations_total: CounterVec,
    /// Stored records at the last snapshot
    pub records_total: Gauge,
    /// Uptime in seconds
    pub uptime_seconds: Gauge,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new(
                "perfindex_predictions_total",
                "Prediction requests by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let prediction_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "perfindex_prediction_latency_seconds",
                "Prediction latency in seconds",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        let record_mutations_total = CounterVec::new(
            Opts::new(
                "perfindex_record_mutations_total",
                "Performance record writes by operation",
            ),
            &["operation"],
        )?;
        registry.register(Box::new(record_mutations_total.clone()))?;

        let records_total = Gauge::with_opts(Opts::new(
            "perfindex_records_total",
            "Number of stored performance records",
        ))?;
        registry.register(Box::new(records_total.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "perfindex_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            prediction_latency_seconds,
            record_mutations_total,
            records_total,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    /// Observes prediction latency when the returned timer is dropped
    pub fn start_prediction_timer(&self) -> HistogramTimer {
        self.prediction_latency_seconds.start_timer()
    }

    /// Increment prediction counter
    pub fn inc_predictions(&self, outcome: &str) {
        self.predictions_total.with_label_values(&[outcome]).inc();
    }

    pub fn predictions(&self, outcome: &str) -> u64 {
        self.predictions_total.with_label_values(&[outcome]).get() as u64
    }

    /// Increment record mutation counter
    pub fn inc_mutations(&self, operation: &str) {
        self.record_mutations_total
            .with_label_values(&[operation])
            .inc();
    }

    pub fn mutations(&self, operation: &str) -> u64 {
        self.record_mutations_total
            .with_label_values(&[operation])
            .get() as u64
    }
}

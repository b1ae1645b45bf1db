//! Push-based metrics reporter for perfindex
//!
//! Periodically outputs metrics as structured JSON to stdout.
//!
//! **Security**: This system only SENDS data, never accepts requests.

use crate::domain::repositories::PerformanceRecordRepository;
use crate::infrastructure::observability::metrics::{Metrics, operation, outcome};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Metrics snapshot for JSON output
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub model_loaded: bool,
    pub records_total: usize,
    pub predictions: BTreeMap<&'static str, u64>,
    pub record_mutations: BTreeMap<&'static str, u64>,
    pub prediction_latency: LatencySnapshot,
}

#[derive(Debug, Serialize)]
pub struct LatencySnapshot {
    pub count: u64,
    pub mean_ms: f64,
}

/// Push-based metrics reporter
///
/// Outputs metrics as structured JSON logs on a configurable interval.
/// No HTTP server, no incoming connections - only outbound data.
pub struct MetricsReporter {
    repository: Arc<dyn PerformanceRecordRepository>,
    metrics: Metrics,
    model_loaded: bool,
    start_time: Instant,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(
        repository: Arc<dyn PerformanceRecordRepository>,
        metrics: Metrics,
        model_loaded: bool,
        interval_seconds: u64,
    ) -> Self {
        Self {
            repository,
            metrics,
            model_loaded,
            start_time: Instant::now(),
            interval: Duration::from_secs(interval_seconds),
        }
    }

    /// Run the reporter in a loop, outputting metrics periodically
    pub async fn run(self) {
        info!(
            "MetricsReporter: Starting push-based metrics (interval: {:?})",
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            match self.collect_snapshot().await {
                Ok(snapshot) => match serde_json::to_string(&snapshot) {
                    Ok(json) => {
                        println!("METRICS_JSON:{}", json);
                        info!(
                            "Records: {} | Predictions: {} | Uptime: {}s",
                            snapshot.records_total,
                            snapshot.predictions.values().sum::<u64>(),
                            snapshot.uptime_seconds
                        );
                        debug!("Prometheus exposition:\n{}", self.metrics.render());
                    }
                    Err(e) => warn!("Failed to serialize metrics: {}", e),
                },
                Err(e) => warn!("Failed to collect metrics: {}", e),
            }
        }
    }

    /// Collect current metrics snapshot
    async fn collect_snapshot(&self) -> anyhow::Result<MetricsSnapshot> {
        let uptime = self.start_time.elapsed().as_secs();
        let records_total = self.repository.count().await?;

        self.metrics.uptime_seconds.set(uptime as f64);
        self.metrics.records_total.set(records_total as f64);

        let latency = &self.metrics.prediction_latency_seconds;
        let count = latency.get_sample_count();
        let mean_ms = if count > 0 {
            latency.get_sample_sum() / count as f64 * 1000.0
        } else {
            0.0
        };

        Ok(MetricsSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            model_loaded: self.model_loaded,
            records_total,
            predictions: outcome::ALL
                .iter()
                .map(|o| (*o, self.metrics.predictions(o)))
                .collect(),
            record_mutations: operation::ALL
                .iter()
                .map(|op| (*op, self.metrics.mutations(op)))
                .collect(),
            prediction_latency: LatencySnapshot { count, mean_ms },
        })
    }
}

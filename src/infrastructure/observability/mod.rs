//! Push-based observability for perfindex
//!
//! This module provides observability through **outbound data only** - no HTTP
//! endpoint, no incoming requests. Metrics live in a Prometheus registry and are
//! pushed as periodic structured JSON logs to stdout.

pub mod metrics;
pub mod reporter;

pub use metrics::Metrics;
pub use reporter::MetricsReporter;

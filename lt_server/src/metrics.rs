//! Prometheus metrics for monitoring table sessions.
//!
//! Metrics are recorded through the `metrics` facade and exported in
//! Prometheus text format when an exporter is installed with [`init_metrics`].
//! Without an exporter every call here is a no-op.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use lt_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::table_operations_total("advance", "ok");
//! metrics::active_sessions(3);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Table Metrics
// ============================================================================

/// Count one table operation by name and outcome.
pub fn table_operations_total(operation: &'static str, outcome: &'static str) {
    metrics::counter!("table_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Set current live session count.
pub fn active_sessions(count: usize) {
    metrics::gauge!("active_sessions").set(count as f64);
}

/// Increment hands dealt counter.
pub fn hands_dealt_total() {
    metrics::counter!("hands_dealt_total").increment(1);
}

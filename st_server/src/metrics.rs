//! Prometheus metrics for monitoring the tournament server.
//!
//! Metrics are exposed in Prometheus text format for scraping when an
//! exporter address is configured. Without one, recording is a no-op.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use st_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/api/v1/tournaments", 200);
//! metrics::draw_generated(false, 3);
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
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
///
/// `path` should be the route template, not the concrete URI, to keep label
/// cardinality bounded.
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
// Draw Metrics
// ============================================================================

/// Record a stored draw and the number of byes it needed.
pub fn draw_generated(regenerated: bool, byes: usize) {
    metrics::counter!("draws_generated_total",
        "regenerated" => regenerated.to_string()
    )
    .increment(1);
    metrics::histogram!("draw_byes").record(byes as f64);
}

/// Increment rejected draw attempts, labelled by reason.
pub fn draw_rejected(reason: &'static str) {
    metrics::counter!("draws_rejected_total", "reason" => reason).increment(1);
}

/// Increment recorded match results.
pub fn match_results_total() {
    metrics::counter!("match_results_total").increment(1);
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route, method, status
//! - `gateway_request_duration_seconds` (histogram): handler latency
//! - `gateway_upstream_requests_total` (counter): upstream calls by outcome
//! - `gateway_upstream_duration_seconds` (histogram): upstream latency
//! - `gateway_batch_pairs_total` (counter): batch pairs by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &str, method: &str, status: u16, start: Instant) {
    let route = route.to_string();
    let method = method.to_string();
    let status = status.to_string();
    counter!(
        "gateway_requests_total",
        "route" => route.clone(),
        "method" => method.clone(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "route" => route,
        "method" => method,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_call(outcome: &'static str, start: Instant) {
    counter!("gateway_upstream_requests_total", "outcome" => outcome).increment(1);
    histogram!("gateway_upstream_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_batch_pairs(successful: usize, failed: usize) {
    counter!("gateway_batch_pairs_total", "outcome" => "success").increment(successful as u64);
    counter!("gateway_batch_pairs_total", "outcome" => "failure").increment(failed as u64);
}

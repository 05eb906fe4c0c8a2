//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by route and status
//! - `http_request_duration_seconds` (histogram): handler latency by route
//! - `username_lookups_total` (counter): remote lookups by stage and outcome
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resolver::LookupStage;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("http_requests_total", "route" => route, "status" => status.to_string()).increment(1);
    histogram!("http_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_lookup(stage: LookupStage, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("username_lookups_total", "stage" => stage.as_str(), "outcome" => outcome).increment(1);
}

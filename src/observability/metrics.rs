//! Metrics collection and exposition.
//!
//! # Metrics
//! - `contact_submissions_total` (counter): submissions by outcome
//! - `contact_forward_duration_seconds` (histogram): webhook round trip
//! - `contact_rate_limit_addresses` (gauge): addresses tracked by the ledger
//!
//! Without an installed recorder every call is a no-op, so tests and the
//! default config pay nothing.

use std::net::SocketAddr;
use std::time::Instant;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_outcome(outcome: &'static str) {
    counter!("contact_submissions_total", "outcome" => outcome).increment(1);
}

pub fn record_forward(status: u16, start: Instant) {
    histogram!("contact_forward_duration_seconds", "status" => status.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_ledger_size(addresses: usize) {
    gauge!("contact_rate_limit_addresses").set(addresses as f64);
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `graceful_requests_rejected_total` (counter): requests refused while draining
//! - `graceful_shutdown_signals_total` (counter): accepted termination signals, by signal
//! - `graceful_shutdown_total` (counter): finished shutdowns, by outcome
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::lifecycle::exit::ShutdownOutcome;
use crate::lifecycle::signals::TerminationSignal;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_rejection() {
    metrics::counter!("graceful_requests_rejected_total").increment(1);
}

pub fn record_signal(signal: TerminationSignal) {
    metrics::counter!("graceful_shutdown_signals_total", "signal" => signal.as_str()).increment(1);
}

pub fn record_outcome(outcome: ShutdownOutcome) {
    metrics::counter!("graceful_shutdown_total", "outcome" => outcome.as_str()).increment(1);
}

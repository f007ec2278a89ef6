//! Metrics collection and exposition.
//!
//! # Metrics
//! - `faucet_claims_total` (counter): claims by outcome
//! - `faucet_throttle_entries` (gauge): stored cool-down entries, including
//!   expired ones the sweeper has not removed yet
//! - `faucet_operation_poll_attempts` (histogram): polls until resolution
//! - `faucet_chain_height` (gauge): last refreshed block height
//! - `faucet_chain_refresh_failures_total` (counter)
//! - `faucet_rpc_calls_total` (counter): wallet RPC calls by method, result

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a finished claim.
pub fn record_claim(outcome: &'static str) {
    counter!("faucet_claims_total", "outcome" => outcome).increment(1);
}

/// Stored throttle entries; drops back to the live count after each sweep.
pub fn record_throttle_entries(count: usize) {
    gauge!("faucet_throttle_entries").set(count as f64);
}

/// Record how many polls an operation took to resolve or time out.
pub fn record_poll_attempts(attempts: u32) {
    histogram!("faucet_operation_poll_attempts").record(attempts as f64);
}

pub fn record_chain_height(height: u64) {
    gauge!("faucet_chain_height").set(height as f64);
}

pub fn record_chain_refresh_failure() {
    counter!("faucet_chain_refresh_failures_total").increment(1);
}

pub fn record_rpc_call(method: &str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    counter!("faucet_rpc_calls_total", "method" => method.to_string(), "result" => result)
        .increment(1);
}

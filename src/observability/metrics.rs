//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_decisions_total` (counter): decisions by decision, route class
//! - `gateway_session_failures_total` (counter): decode failures by reason
//! - `gateway_audit_dropped_total` (counter): audit events lost to backpressure
//! - `gateway_upstream_requests_total` (counter): forwarded requests by status
//! - `gateway_upstream_duration_seconds` (histogram): upstream latency
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Failure reasons are metric labels only, never response content

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::gateway::Evaluation;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one gateway evaluation.
pub fn record_evaluation(evaluation: &Evaluation) {
    counter!(
        "gateway_decisions_total",
        "decision" => evaluation.decision.as_str(),
        "route" => evaluation.route.as_str(),
    )
    .increment(1);

    if let Some(failure) = evaluation.failure() {
        counter!("gateway_session_failures_total", "reason" => failure.reason()).increment(1);
    }
}

pub fn record_audit_dropped() {
    counter!("gateway_audit_dropped_total").increment(1);
}

/// Record a forwarded request's upstream status and latency.
pub fn record_upstream(status: u16, start: Instant) {
    counter!("gateway_upstream_requests_total", "status" => status.to_string()).increment(1);
    histogram!("gateway_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}

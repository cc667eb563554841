//! # Metrics
//!
//! The watchdog records through the `metrics` facade; without an installed
//! recorder every macro is a no-op. [`install_exporter`] serves the
//! Prometheus text format on the configured listen address.
//!
//! **Counters:**
//! - `watchdog_probes_total{result, reason}` - Health probes by outcome
//! - `watchdog_failover_attempts_total{outcome}` - Promotion procedure runs
//! - `watchdog_cooldown_skips_total` - Threshold crossings refused by the cooldown
//!
//! **Histograms:**
//! - `watchdog_probe_latency_seconds` - Health endpoint response time
//! - `watchdog_failover_duration_seconds` - Promotion procedure wall time
//!
//! **Gauges:**
//! - `watchdog_consecutive_failures` - Current failure run
//! - `watchdog_state` - 0 healthy, 1 degrading, 2 failover pending, 3 cooldown blocked

use crate::config::MetricsConfig;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use thiserror::Error;

/// Exporter setup failures. Fatal only at startup.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("invalid metrics listen address '{0}'")]
    InvalidListen(String),

    #[error("failed to install Prometheus exporter: {0}")]
    Install(String),
}

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    metrics::describe_counter!("watchdog_probes_total", "Health probes by result");
    metrics::describe_counter!(
        "watchdog_failover_attempts_total",
        "Failover procedure invocations by outcome"
    );
    metrics::describe_counter!(
        "watchdog_cooldown_skips_total",
        "Threshold crossings skipped because of the cooldown"
    );
    metrics::describe_histogram!(
        "watchdog_probe_latency_seconds",
        metrics::Unit::Seconds,
        "Health endpoint response time"
    );
    metrics::describe_histogram!(
        "watchdog_failover_duration_seconds",
        metrics::Unit::Seconds,
        "Failover procedure wall-clock duration"
    );
    metrics::describe_gauge!(
        "watchdog_consecutive_failures",
        "Consecutive failed probes in the current run"
    );
    metrics::describe_gauge!("watchdog_state", "Control loop state");
}

/// Start the Prometheus HTTP listener. Must run inside a Tokio runtime.
pub fn install_exporter(config: &MetricsConfig) -> Result<SocketAddr, MetricsError> {
    let addr: SocketAddr = config
        .listen
        .parse()
        .map_err(|_| MetricsError::InvalidListen(config.listen.clone()))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    describe_metrics();
    tracing::info!(listen = %addr, "Prometheus exporter listening");
    Ok(addr)
}

//! Health probing of the primary endpoint.
//!
//! A probe is one HTTP GET against the configured health URL. Every failure
//! mode (transport error, timeout, non-2xx status) collapses to `false` for
//! the control loop; the typed cause is logged and available through
//! [`HttpProbe::check`] for one-shot diagnostics.

mod error;


pub use error::*;

use crate::config::ProbeConfig;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// A single health check against the monitored target.
///
/// Implementations must never panic or block past their own timeout: any
/// failure is reported as `false`.
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    /// Human-readable description of the target, for logs.
    fn target(&self) -> &str;

    /// Perform one health check. `true` only on an explicit success signal.
    async fn probe(&self) -> bool;
}

/// HTTP GET probe with a bounded per-request timeout.
pub struct HttpProbe {
    url: String,
    /// HTTP client with connection pooling
    client: reqwest::Client,
    timeout_seconds: u64,
}

impl HttpProbe {
    /// Create a probe with its own HTTP client.
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("failover-watchdog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProbeError::Client(e.to_string()))?;

        Ok(Self::with_client(
            config.url.clone(),
            client,
            config.timeout_seconds,
        ))
    }

    /// Create a probe with a custom HTTP client (for testing).
    pub fn with_client(url: String, client: reqwest::Client, timeout_seconds: u64) -> Self {
        Self {
            url,
            client,
            timeout_seconds,
        }
    }

    /// Run one check and return the response latency on success.
    pub async fn check(&self) -> Result<Duration, ProbeError> {
        let start = Instant::now();

        let response = self
            .client
            .get(&self.url)
            .timeout(Duration::from_secs(self.timeout_seconds))
            .send()
            .await
            .map_err(|e| Self::classify_error(e, self.timeout_seconds))?;

        let latency = start.elapsed();
        metrics::histogram!("watchdog_probe_latency_seconds").record(latency.as_secs_f64());

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::HttpError(status.as_u16()));
        }

        Ok(latency)
    }

    /// Classify reqwest error into ProbeError.
    fn classify_error(e: reqwest::Error, timeout_seconds: u64) -> ProbeError {
        if e.is_timeout() {
            ProbeError::Timeout(timeout_seconds)
        } else {
            ProbeError::ConnectionFailed(e.to_string())
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn target(&self) -> &str {
        &self.url
    }

    async fn probe(&self) -> bool {
        match self.check().await {
            Ok(latency) => {
                tracing::debug!(
                    target_url = %self.url,
                    latency_ms = latency.as_millis() as u64,
                    "Health check passed"
                );
                metrics::counter!("watchdog_probes_total", "result" => "success").increment(1);
                true
            }
            Err(error) => {
                tracing::warn!(
                    target_url = %self.url,
                    error = %error,
                    "Health check failed"
                );
                metrics::counter!(
                    "watchdog_probes_total",
                    "result" => "failure",
                    "reason" => error.kind()
                )
                .increment(1);
                false
            }
        }
    }
}

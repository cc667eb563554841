//! Health probe configuration

use super::{env, require_positive, ConfigError};
use serde::{Deserialize, Serialize};

/// Settings for the primary health probe and the failure threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Health endpoint of the primary (required)
    pub url: String,
    /// Seconds between probes
    pub interval_seconds: u64,
    /// Timeout for a single probe request
    pub timeout_seconds: u64,
    /// Consecutive failed probes before a failover is attempted
    pub failure_threshold: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            interval_seconds: 30,
            timeout_seconds: 10,
            failure_threshold: 3,
        }
    }
}

impl ProbeConfig {
    /// Check the target URL, timings and threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "probe.url (or {})",
                env::HEALTH_URL
            )));
        }
        if let Err(e) = reqwest::Url::parse(&self.url) {
            return Err(ConfigError::Validation {
                field: "probe.url".to_string(),
                message: e.to_string(),
            });
        }

        require_positive("probe.interval_seconds", self.interval_seconds)?;
        require_positive("probe.timeout_seconds", self.timeout_seconds)?;

        if self.failure_threshold == 0 {
            return Err(ConfigError::Validation {
                field: "probe.failure_threshold".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

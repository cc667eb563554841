//! Prometheus exporter configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Prometheus exporter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Socket address the exporter listens on
    pub listen: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen: "0.0.0.0:9110".to_string(),
        }
    }
}

impl MetricsConfig {
    /// When enabled, `listen` must parse as a socket address.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.listen.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Validation {
                field: "metrics.listen".to_string(),
                message: format!("'{}' is not a socket address", self.listen),
            });
        }
        Ok(())
    }
}

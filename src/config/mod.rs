//! Configuration module for the watchdog
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PRIMARY_HEALTH_URL`, `CHECK_INTERVAL`, `WATCHDOG_*`, ...)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use watchdog::config::WatchdogConfig;
//!
//! let toml = r#"
//! [probe]
//! url = "https://git.example.com/api/healthz"
//! failure_threshold = 5
//! "#;
//! let config: WatchdogConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.probe.failure_threshold, 5);
//! assert_eq!(config.failover.cooldown_seconds, 3600);
//! assert!(config.validate().is_ok());
//! ```

pub mod error;
pub mod failover;
pub mod logging;
pub mod metrics;
pub mod probe;

pub use error::ConfigError;
pub use failover::FailoverConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use self::metrics::MetricsConfig;
pub use probe::ProbeConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Environment variables understood by [`WatchdogConfig::with_env_overrides`].
pub mod env {
    pub const HEALTH_URL: &str = "PRIMARY_HEALTH_URL";
    pub const CHECK_INTERVAL: &str = "CHECK_INTERVAL";
    pub const FAIL_THRESHOLD: &str = "FAIL_THRESHOLD";
    pub const PROBE_TIMEOUT: &str = "WATCHDOG_PROBE_TIMEOUT";
    pub const COOLDOWN: &str = "COOLDOWN_SEC";
    pub const PLAYBOOK: &str = "ANSIBLE_PLAYBOOK";
    pub const INVENTORY: &str = "ANSIBLE_INVENTORY";
    pub const FAILOVER_PROGRAM: &str = "WATCHDOG_FAILOVER_PROGRAM";
    pub const FAILOVER_TIMEOUT: &str = "WATCHDOG_FAILOVER_TIMEOUT";
    pub const LOG_LEVEL: &str = "WATCHDOG_LOG_LEVEL";
    pub const LOG_FORMAT: &str = "WATCHDOG_LOG_FORMAT";
    pub const METRICS_LISTEN: &str = "WATCHDOG_METRICS_LISTEN";
}

/// Complete watchdog configuration, immutable once the loop starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Health probe target and failure threshold
    pub probe: ProbeConfig,
    /// Promotion procedure and cooldown
    pub failover: FailoverConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Prometheus exporter
    pub metrics: MetricsConfig,
}

impl WatchdogConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Values that fail to parse are rejected with [`ConfigError::InvalidEnv`]
    /// instead of being ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(env::HEALTH_URL) {
            self.probe.url = url;
        }
        if let Some(v) = parse_env(&lookup, env::CHECK_INTERVAL)? {
            self.probe.interval_seconds = v;
        }
        if let Some(v) = parse_env(&lookup, env::FAIL_THRESHOLD)? {
            self.probe.failure_threshold = v;
        }
        if let Some(v) = parse_env(&lookup, env::PROBE_TIMEOUT)? {
            self.probe.timeout_seconds = v;
        }

        if let Some(v) = parse_env(&lookup, env::COOLDOWN)? {
            self.failover.cooldown_seconds = v;
        }
        if let Some(v) = parse_env(&lookup, env::FAILOVER_TIMEOUT)? {
            self.failover.timeout_seconds = v;
        }
        if let Some(playbook) = lookup(env::PLAYBOOK) {
            self.failover.playbook = playbook;
        }
        if let Some(inventory) = lookup(env::INVENTORY) {
            self.failover.inventory = inventory;
        }
        if let Some(program) = lookup(env::FAILOVER_PROGRAM) {
            self.failover.program = program;
        }

        if let Some(level) = lookup(env::LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(format) = parse_env(&lookup, env::LOG_FORMAT)? {
            self.logging.format = format;
        }

        if let Some(listen) = lookup(env::METRICS_LISTEN) {
            self.metrics.enabled = true;
            self.metrics.listen = listen;
        }

        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.probe.validate()?;
        self.failover.validate()?;
        self.metrics.validate()
    }
}

/// Reject a zero value for a field that must be positive.
pub(crate) fn require_positive(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation {
            field: field.to_string(),
            message: "must be greater than 0".to_string(),
        });
    }
    Ok(())
}

fn parse_env<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                var: key.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn valid_config() -> WatchdogConfig {
        let mut config = WatchdogConfig::default();
        config.probe.url = "http://primary.internal:3000/api/healthz".to_string();
        config
    }

    #[test]
    fn test_watchdog_config_defaults() {
        let config = WatchdogConfig::default();
        assert_eq!(config.probe.interval_seconds, 30);
        assert_eq!(config.probe.failure_threshold, 3);
        assert_eq!(config.failover.cooldown_seconds, 3600);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_config_parse_full_toml() {
        let toml = include_str!("../../watchdog.example.toml");
        let config: WatchdogConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.failover.program, "ansible-playbook");
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            temp.path(),
            "[probe]\nurl = \"http://10.0.0.1/healthz\"\ninterval_seconds = 5",
        )
        .unwrap();

        let config = WatchdogConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.probe.interval_seconds, 5);
        assert_eq!(config.probe.url, "http://10.0.0.1/healthz");
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = WatchdogConfig::load(Some(Path::new("/nonexistent/watchdog.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_invalid_toml_error() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[probe\nurl = ").unwrap();
        let result = WatchdogConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = WatchdogConfig::load(None).unwrap();
        assert_eq!(config, WatchdogConfig::default());
    }

    #[test]
    fn test_env_overrides_deployment_variable_names() {
        let lookup = lookup_from(&[
            ("PRIMARY_HEALTH_URL", "https://git.example.com/api/healthz"),
            ("CHECK_INTERVAL", "15"),
            ("FAIL_THRESHOLD", "4"),
            ("COOLDOWN_SEC", "600"),
            ("ANSIBLE_PLAYBOOK", "/srv/promote.yml"),
            ("ANSIBLE_INVENTORY", "/srv/hosts.yml"),
        ]);
        let config = WatchdogConfig::default()
            .with_overrides_from(lookup)
            .unwrap();

        assert_eq!(config.probe.url, "https://git.example.com/api/healthz");
        assert_eq!(config.probe.interval_seconds, 15);
        assert_eq!(config.probe.failure_threshold, 4);
        assert_eq!(config.failover.cooldown_seconds, 600);
        assert_eq!(config.failover.playbook, "/srv/promote.yml");
        assert_eq!(config.failover.inventory, "/srv/hosts.yml");
    }

    #[test]
    fn test_env_overrides_watchdog_variables() {
        let lookup = lookup_from(&[
            ("WATCHDOG_PROBE_TIMEOUT", "3"),
            ("WATCHDOG_FAILOVER_TIMEOUT", "120"),
            ("WATCHDOG_FAILOVER_PROGRAM", "/usr/local/bin/promote"),
            ("WATCHDOG_LOG_LEVEL", "debug"),
            ("WATCHDOG_LOG_FORMAT", "json"),
            ("WATCHDOG_METRICS_LISTEN", "127.0.0.1:9200"),
        ]);
        let config = WatchdogConfig::default()
            .with_overrides_from(lookup)
            .unwrap();

        assert_eq!(config.probe.timeout_seconds, 3);
        assert_eq!(config.failover.timeout_seconds, 120);
        assert_eq!(config.failover.program, "/usr/local/bin/promote");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.listen, "127.0.0.1:9200");
    }

    #[test]
    fn test_env_invalid_number_rejected() {
        let lookup = lookup_from(&[("FAIL_THRESHOLD", "three")]);
        let result = WatchdogConfig::default().with_overrides_from(lookup);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnv { ref var, .. }) if var == "FAIL_THRESHOLD"
        ));
    }

    #[test]
    fn test_env_invalid_log_format_rejected() {
        let lookup = lookup_from(&[("WATCHDOG_LOG_FORMAT", "xml")]);
        let result = WatchdogConfig::default().with_overrides_from(lookup);
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }

    #[test]
    fn test_env_absent_keeps_file_values() {
        let mut config = valid_config();
        config.probe.failure_threshold = 7;
        let config = config.with_overrides_from(|_| None).unwrap();
        assert_eq!(config.probe.failure_threshold, 7);
    }

    #[test]
    fn test_validation_accepts_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_url() {
        let result = WatchdogConfig::default().validate();
        assert!(matches!(result, Err(ConfigError::MissingField(ref f)) if f.contains("probe.url")));
    }

    #[test]
    fn test_validation_unparseable_url() {
        let mut config = valid_config();
        config.probe.url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "probe.url"
        ));
    }

    #[test]
    fn test_validation_zero_threshold() {
        let mut config = valid_config();
        config.probe.failure_threshold = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "probe.failure_threshold"
        ));
    }

    #[test]
    fn test_validation_zero_interval() {
        let mut config = valid_config();
        config.probe.interval_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "probe.interval_seconds"
        ));
    }

    #[test]
    fn test_validation_zero_invocation_timeout() {
        let mut config = valid_config();
        config.failover.timeout_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "failover.timeout_seconds"
        ));
    }

    #[test]
    fn test_validation_zero_cooldown_allowed() {
        let mut config = valid_config();
        config.failover.cooldown_seconds = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_program() {
        let mut config = valid_config();
        config.failover.program = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "failover.program"
        ));
    }

    #[test]
    fn test_validation_bad_metrics_listen() {
        let mut config = valid_config();
        config.metrics.enabled = true;
        config.metrics.listen = "localhost".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "metrics.listen"
        ));
    }
}

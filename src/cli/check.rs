//! Check command implementation

use crate::cli::{load_config, CheckArgs};
use crate::health::HttpProbe;
use colored::Colorize;
use serde::Serialize;

/// Result of a one-shot probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub url: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Probe the configured target once.
pub async fn handle_check(args: &CheckArgs) -> Result<CheckReport, Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;
    if let Some(ref url) = args.url {
        config.probe.url = url.clone();
    }
    config.probe.validate()?;

    let probe = HttpProbe::new(&config.probe)?;
    let report = match probe.check().await {
        Ok(latency) => CheckReport {
            url: config.probe.url,
            healthy: true,
            latency_ms: Some(latency.as_millis() as u64),
            error: None,
        },
        Err(e) => CheckReport {
            url: config.probe.url,
            healthy: false,
            latency_ms: None,
            error: Some(e.to_string()),
        },
    };

    Ok(report)
}

/// Render a report as text or JSON
pub fn format_check(report: &CheckReport, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(report).unwrap_or_default();
    }

    match (report.healthy, report.latency_ms, &report.error) {
        (true, Some(ms), _) => format!("{} {} ({}ms)", "Healthy".green(), report.url, ms),
        (true, None, _) => format!("{} {}", "Healthy".green(), report.url),
        (false, _, Some(error)) => format!("{} {}: {}", "Unhealthy".red(), report.url, error),
        (false, _, None) => format!("{} {}", "Unhealthy".red(), report.url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(url: String) -> CheckArgs {
        CheckArgs {
            config: PathBuf::from("nonexistent-watchdog.toml"),
            url: Some(url),
            json: false,
        }
    }

    #[tokio::test]
    async fn test_check_healthy_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let report = handle_check(&args(server.uri())).await.unwrap();
        assert!(report.healthy);
        assert!(report.latency_ms.is_some());
        assert!(report.error.is_none());
    }

    #[tokio::test]
    async fn test_check_unhealthy_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let report = handle_check(&args(server.uri())).await.unwrap();
        assert!(!report.healthy);
        assert_eq!(report.error.as_deref(), Some("HTTP error: 502"));
    }

    #[tokio::test]
    async fn test_check_ignores_unrelated_sections() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            "[failover]\nprogram = \"\"\n[metrics]\nenabled = true\nlisten = \"nowhere\"\n",
        )
        .unwrap();
        let check_args = CheckArgs {
            config: file.path().to_path_buf(),
            url: Some(server.uri()),
            json: false,
        };

        let report = handle_check(&check_args).await.unwrap();
        assert!(report.healthy);
    }

    #[tokio::test]
    async fn test_check_still_requires_valid_probe() {
        let error = handle_check(&args(String::new()))
            .await
            .unwrap_err()
            .to_string();
        assert!(error.contains("Missing required field"));
    }

    #[test]
    fn test_format_check_json() {
        let report = CheckReport {
            url: "http://10.0.0.1/healthz".to_string(),
            healthy: false,
            latency_ms: None,
            error: Some("request timeout after 10s".to_string()),
        };
        let value: serde_json::Value =
            serde_json::from_str(&format_check(&report, true)).unwrap();
        assert_eq!(value["healthy"], false);
        assert_eq!(value["error"], "request timeout after 10s");
        assert!(value.get("latency_ms").is_none());
    }

    #[test]
    fn test_format_check_text() {
        colored::control::set_override(false);
        let report = CheckReport {
            url: "http://10.0.0.1/healthz".to_string(),
            healthy: true,
            latency_ms: Some(12),
            error: None,
        };
        assert_eq!(
            format_check(&report, false),
            "Healthy http://10.0.0.1/healthz (12ms)"
        );
    }
}

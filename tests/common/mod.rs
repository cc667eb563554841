//! Shared test utilities for watchdog integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use watchdog::config::WatchdogConfig;
use watchdog::failover::{CommandInvoker, FailoverInvoker, InvocationError, InvocationResult};

/// Invoker that counts calls and fails with a fixed exit code when asked to.
pub struct CountingInvoker {
    calls: AtomicUsize,
    exit_code: Option<i32>,
}

impl CountingInvoker {
    pub fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            exit_code: None,
        }
    }

    pub fn failing(code: i32) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            exit_code: Some(code),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FailoverInvoker for CountingInvoker {
    fn describe(&self) -> String {
        "counting-invoker".to_string()
    }

    async fn invoke(&self) -> InvocationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.exit_code {
            None => InvocationResult::success("promoted"),
            Some(code) => InvocationResult::failure(InvocationError::NonZeroExit(code), "boom"),
        }
    }
}

/// Config pointing at `url` with the given threshold and cooldown.
pub fn make_config(url: &str, threshold: u32, cooldown_seconds: u64) -> WatchdogConfig {
    let mut config = WatchdogConfig::default();
    config.probe.url = url.to_string();
    config.probe.interval_seconds = 1;
    config.probe.timeout_seconds = 1;
    config.probe.failure_threshold = threshold;
    config.failover.cooldown_seconds = cooldown_seconds;
    config
}

/// Shell invoker that appends one line to `marker` each time it runs.
#[cfg(unix)]
pub fn marker_invoker(marker: &Path) -> CommandInvoker {
    CommandInvoker::new(
        "sh",
        vec![
            "-c".to_string(),
            format!("echo promoted >> '{}'", marker.display()),
        ],
        Duration::from_secs(10),
    )
}

/// Number of lines written by [`marker_invoker`].
pub fn marker_count(marker: &Path) -> usize {
    std::fs::read_to_string(marker)
        .map(|content| content.lines().count())
        .unwrap_or(0)
}

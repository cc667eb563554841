//! Control-loop states and per-tick outcomes.

use crate::failover::InvocationError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Logical state of the watchdog after (or, for `FailoverPending`, during) a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WatchdogState {
    /// No outstanding failures
    #[default]
    Healthy,
    /// Failures accumulating, threshold not reached
    Degrading,
    /// Threshold reached, promotion procedure running
    FailoverPending,
    /// Threshold reached but the cooldown gate was closed; holds until the
    /// primary answers again or a later crossing is handled
    CooldownBlocked,
}

impl WatchdogState {
    /// Numeric encoding for the `watchdog_state` gauge.
    pub fn as_gauge(self) -> f64 {
        match self {
            WatchdogState::Healthy => 0.0,
            WatchdogState::Degrading => 1.0,
            WatchdogState::FailoverPending => 2.0,
            WatchdogState::CooldownBlocked => 3.0,
        }
    }
}

impl fmt::Display for WatchdogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WatchdogState::Healthy => "healthy",
            WatchdogState::Degrading => "degrading",
            WatchdogState::FailoverPending => "failover_pending",
            WatchdogState::CooldownBlocked => "cooldown_blocked",
        };
        f.write_str(name)
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Probe passed, nothing outstanding
    Healthy,
    /// Probe passed after a run of failures
    Recovered { after_failures: u32 },
    /// Probe failed, threshold not yet reached
    Degrading { failures: u32, threshold: u32 },
    /// Threshold reached while the cooldown gate was closed
    CooldownSkipped { remaining: Duration },
    /// Promotion procedure exited 0; cooldown starts at `at`
    FailoverSucceeded { at: DateTime<Utc> },
    /// Promotion procedure failed; cooldown untouched
    FailoverFailed { error: InvocationError },
}

impl TickOutcome {
    /// Whether this tick ran the promotion procedure.
    pub fn attempted_failover(&self) -> bool {
        matches!(
            self,
            TickOutcome::FailoverSucceeded { .. } | TickOutcome::FailoverFailed { .. }
        )
    }
}

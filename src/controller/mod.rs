//! The failover control loop.
//!
//! Each tick probes the primary, feeds the result to the [`FailureTracker`],
//! and, once the threshold is reached and the [`CooldownGate`] is open, runs
//! the promotion procedure. A tick runs to completion before the next one
//! starts, so at most one invocation is ever in flight.

mod state;


pub use state::{TickOutcome, WatchdogState};

use crate::config::WatchdogConfig;
use crate::failover::{
    Clock, CooldownGate, FailoverInvoker, FailureTracker, InvocationError, SystemClock,
};
use crate::health::Probe;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Owns all watchdog state and drives the probe → decide → invoke cycle.
pub struct Watchdog {
    probe: Arc<dyn Probe>,
    invoker: Arc<dyn FailoverInvoker>,
    clock: Arc<dyn Clock>,
    tracker: FailureTracker,
    gate: CooldownGate,
    /// Sleep between ticks
    interval: Duration,
    probe_timeout: Duration,
    invocation_timeout: Duration,
    state: WatchdogState,
}

impl Watchdog {
    /// Create a watchdog using the system clock.
    pub fn new(
        config: &WatchdogConfig,
        probe: Arc<dyn Probe>,
        invoker: Arc<dyn FailoverInvoker>,
    ) -> Self {
        Self {
            probe,
            invoker,
            clock: Arc::new(SystemClock),
            tracker: FailureTracker::new(config.probe.failure_threshold),
            gate: CooldownGate::new(Duration::from_secs(config.failover.cooldown_seconds)),
            interval: Duration::from_secs(config.probe.interval_seconds),
            probe_timeout: Duration::from_secs(config.probe.timeout_seconds),
            invocation_timeout: Duration::from_secs(config.failover.timeout_seconds),
            state: WatchdogState::Healthy,
        }
    }

    /// Replace the clock (for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> WatchdogState {
        self.state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.tracker.count()
    }

    /// Completion time of the last successful failover.
    pub fn last_failover_at(&self) -> Option<DateTime<Utc>> {
        self.gate.last_failover_at()
    }

    /// Log the effective settings once at startup.
    pub fn log_startup(&self) {
        tracing::info!(
            target_url = %self.probe.target(),
            interval_seconds = self.interval.as_secs(),
            probe_timeout_seconds = self.probe_timeout.as_secs(),
            failure_threshold = self.tracker.threshold(),
            cooldown_seconds = self.gate.cooldown().as_secs(),
            failover_timeout_seconds = self.invocation_timeout.as_secs(),
            command = %self.invoker.describe(),
            "Watchdog starting"
        );
    }

    /// Run one probe and act on the result.
    pub async fn tick(&mut self) -> TickOutcome {
        if self.probe.probe().await {
            let outcome = match self.tracker.record_success() {
                Some(after_failures) => TickOutcome::Recovered { after_failures },
                None => TickOutcome::Healthy,
            };
            self.set_state(WatchdogState::Healthy);
            return outcome;
        }

        let failures = self.tracker.record_failure();
        if !self.tracker.threshold_reached() {
            if self.state != WatchdogState::CooldownBlocked {
                self.set_state(WatchdogState::Degrading);
            } else {
                self.publish_gauges();
            }
            return TickOutcome::Degrading {
                failures,
                threshold: self.tracker.threshold(),
            };
        }

        if let Some(remaining) = self.gate.remaining(self.clock.now()) {
            tracing::warn!(
                remaining_seconds = remaining.as_secs(),
                consecutive_failures = failures,
                "Cooldown active ({}s left). Skipping failover.",
                remaining.as_secs()
            );
            metrics::counter!("watchdog_cooldown_skips_total").increment(1);
            self.tracker.reset();
            self.set_state(WatchdogState::CooldownBlocked);
            return TickOutcome::CooldownSkipped { remaining };
        }

        self.set_state(WatchdogState::FailoverPending);
        let outcome = self.trigger_failover(failures).await;

        // One attempt per threshold crossing, whatever the outcome
        self.tracker.reset();
        self.set_state(WatchdogState::Healthy);
        outcome
    }

    async fn trigger_failover(&mut self, failures: u32) -> TickOutcome {
        let attempt_id = Uuid::new_v4();

        tracing::error!(
            attempt_id = %attempt_id,
            consecutive_failures = failures,
            "*** TRIGGERING FAILOVER ***"
        );
        tracing::info!(
            attempt_id = %attempt_id,
            command = %self.invoker.describe(),
            "Running failover procedure"
        );

        let result = self.invoker.invoke().await;
        result.log_output(attempt_id);

        metrics::histogram!("watchdog_failover_duration_seconds")
            .record(result.elapsed.as_secs_f64());

        match result.outcome {
            Ok(()) => {
                let at = self.clock.now();
                self.gate.mark_triggered(at);
                tracing::info!(
                    attempt_id = %attempt_id,
                    completed_at = %at,
                    elapsed_ms = result.elapsed.as_millis() as u64,
                    "Failover completed successfully, cooldown started"
                );
                metrics::counter!("watchdog_failover_attempts_total", "outcome" => "success")
                    .increment(1);
                TickOutcome::FailoverSucceeded { at }
            }
            Err(error) => {
                match &error {
                    InvocationError::Timeout(secs) => tracing::error!(
                        attempt_id = %attempt_id,
                        timeout_seconds = secs,
                        "Failover procedure timed out ({}s), process killed",
                        secs
                    ),
                    InvocationError::NonZeroExit(code) => tracing::error!(
                        attempt_id = %attempt_id,
                        exit_code = code,
                        "Failover procedure failed (exit {})",
                        code
                    ),
                    other => tracing::error!(
                        attempt_id = %attempt_id,
                        error = %other,
                        "Failover procedure failed"
                    ),
                }
                metrics::counter!(
                    "watchdog_failover_attempts_total",
                    "outcome" => error.kind()
                )
                .increment(1);
                TickOutcome::FailoverFailed { error }
            }
        }
    }

    fn set_state(&mut self, state: WatchdogState) {
        if state != self.state {
            tracing::debug!(from = %self.state, to = %state, "Watchdog state changed");
            self.state = state;
        }
        self.publish_gauges();
    }

    fn publish_gauges(&self) {
        metrics::gauge!("watchdog_state").set(self.state.as_gauge());
        metrics::gauge!("watchdog_consecutive_failures").set(self.tracker.count() as f64);
    }

    /// Tick forever, sleeping `interval` between ticks, until cancelled.
    ///
    /// Cancellation only interrupts the sleep; a tick in progress (including
    /// a running invocation) always completes.
    pub async fn run(mut self, cancel_token: CancellationToken) {
        tracing::info!(
            interval_seconds = self.interval.as_secs(),
            "Watchdog loop started"
        );

        loop {
            let outcome = self.tick().await;
            tracing::debug!(
                ?outcome,
                state = %self.state,
                consecutive_failures = self.tracker.count(),
                "Tick completed"
            );

            tokio::select! {
                _ = cancel_token.cancelled() => {
                    tracing::info!("Watchdog shutting down");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// Spawn [`Watchdog::run`] on the runtime.
    pub fn start(self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel_token))
    }
}

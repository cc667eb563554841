//! Consecutive-failure counting.

/// Counts consecutive failed probes against a threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureTracker {
    threshold: u32,
    consecutive_failures: u32,
}

impl FailureTracker {
    /// `threshold` is clamped to at least 1.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive_failures: 0,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn count(&self) -> u32 {
        self.consecutive_failures
    }

    /// Record a successful probe.
    ///
    /// Returns the number of failures that preceded it when the target is
    /// recovering, `None` when it was already healthy.
    pub fn record_success(&mut self) -> Option<u32> {
        let prior = std::mem::take(&mut self.consecutive_failures);
        if prior == 0 {
            return None;
        }
        tracing::info!(
            previous_failures = prior,
            "Primary recovered after {} failure(s)",
            prior
        );
        Some(prior)
    }

    /// Record a failed probe and return the updated count.
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        tracing::warn!(
            consecutive_failures = self.consecutive_failures,
            threshold = self.threshold,
            "FAIL {}/{}",
            self.consecutive_failures,
            self.threshold
        );
        self.consecutive_failures
    }

    pub fn threshold_reached(&self) -> bool {
        self.consecutive_failures >= self.threshold
    }

    pub fn reset(&mut self) {
        self.consecutive_failures = 0;
    }
}

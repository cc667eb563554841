//! Rate limiting of successful failovers.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Refuses to trigger a new failover until `cooldown` has elapsed since the
/// last successful one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownGate {
    cooldown: Duration,
    last_failover_at: Option<DateTime<Utc>>,
}

impl CooldownGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_failover_at: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// When the last successful failover completed, if any.
    pub fn last_failover_at(&self) -> Option<DateTime<Utc>> {
        self.last_failover_at
    }

    pub fn can_trigger(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now).is_none()
    }

    /// Time left before the gate opens, or `None` when it is open.
    ///
    /// A clock that moved backwards past the last failover counts as zero
    /// elapsed time.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        let last = self.last_failover_at?;
        let elapsed = now
            .signed_duration_since(last)
            .to_std()
            .unwrap_or(Duration::ZERO);

        if elapsed >= self.cooldown {
            None
        } else {
            Some(self.cooldown - elapsed)
        }
    }

    /// Record a successful failover. The timestamp never moves backwards.
    pub fn mark_triggered(&mut self, now: DateTime<Utc>) {
        self.last_failover_at = Some(match self.last_failover_at {
            Some(last) if last > now => last,
            _ => now,
        });
    }
}

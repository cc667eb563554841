//! Failover watchdog
//!
//! Probes a primary service, counts consecutive failures, and runs an
//! external promotion procedure once a threshold is reached, rate-limited by
//! a cooldown after each successful failover.

pub mod cli;
pub mod config;
pub mod controller;
pub mod failover;
pub mod health;
pub mod logging;
pub mod metrics;

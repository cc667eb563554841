//! Failover decision building blocks.
//!
//! - [`FailureTracker`] debounces probe failures against a threshold.
//! - [`CooldownGate`] rate-limits successful failovers.
//! - [`FailoverInvoker`] runs the external promotion procedure;
//!   [`CommandInvoker`] is the subprocess implementation.
//! - [`Clock`] abstracts the current time for the gate.

mod clock;
mod cooldown;
mod error;
mod invoker;
mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cooldown::CooldownGate;
pub use error::InvocationError;
pub use invoker::{CommandInvoker, FailoverInvoker, InvocationResult, DEFAULT_DRAIN_GRACE};
pub use tracker::FailureTracker;

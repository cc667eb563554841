//! Error types for failover invocation.

use thiserror::Error;

/// Ways a failover invocation can fail. None of them stop the watchdog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// The program could not be started at all
    #[error("failed to launch '{program}': {reason}")]
    Launch { program: String, reason: String },

    /// Deadline exceeded; the process was killed
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// Ran to completion but reported failure
    #[error("exited with code {0}")]
    NonZeroExit(i32),

    /// Terminated by a signal before producing an exit code
    #[error("terminated by signal{}", .0.map(|s| format!(" {}", s)).unwrap_or_default())]
    Signaled(Option<i32>),

    /// Waiting on the child failed
    #[error("failed to wait for process: {0}")]
    Wait(String),
}

impl InvocationError {
    /// Short label used for the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            InvocationError::Launch { .. } => "launch_error",
            InvocationError::Timeout(_) => "timeout",
            InvocationError::NonZeroExit(_) => "non_zero_exit",
            InvocationError::Signaled(_) => "signaled",
            InvocationError::Wait(_) => "wait_error",
        }
    }
}

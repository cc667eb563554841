//! Error types for health probing.

use thiserror::Error;

/// Reasons a single probe can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection failed (refused, reset, DNS, TLS)
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Target answered with a non-2xx status
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ProbeError {
    /// Short label used for the `reason` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Timeout(_) => "timeout",
            ProbeError::ConnectionFailed(_) => "connection",
            ProbeError::HttpError(_) => "http_status",
            ProbeError::Client(_) => "client",
        }
    }
}

//! Supervised execution of the external promotion procedure.

use super::error::InvocationError;
use crate::config::FailoverConfig;
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// How long output readers may keep running after the process has exited or
/// been killed. Grandchildren that inherited the pipes can hold them open.
pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Result of one failover invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    pub outcome: Result<(), InvocationError>,
    /// Captured standard output, lossily decoded
    pub stdout: String,
    /// Captured standard error, lossily decoded
    pub stderr: String,
    pub elapsed: Duration,
}

impl InvocationResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            outcome: Ok(()),
            stdout: stdout.into(),
            stderr: String::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn failure(error: InvocationError, stderr: impl Into<String>) -> Self {
        Self {
            outcome: Err(error),
            stdout: String::new(),
            stderr: stderr.into(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Emit the captured output: stdout always, stderr only on failure.
    pub fn log_output(&self, attempt_id: Uuid) {
        tracing::info!(
            attempt_id = %attempt_id,
            "stdout:\n{}",
            self.stdout
        );
        if !self.is_success() {
            tracing::error!(
                attempt_id = %attempt_id,
                "stderr:\n{}",
                self.stderr
            );
        }
    }
}

/// An invokable, idempotent promotion procedure.
#[async_trait]
pub trait FailoverInvoker: Send + Sync + 'static {
    /// Human-readable command line, for logs.
    fn describe(&self) -> String;

    /// Run the procedure once. Never retries and never panics.
    async fn invoke(&self) -> InvocationResult;
}

/// Runs a program with a literal argument vector under a hard timeout.
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    drain_grace: Duration,
}

impl CommandInvoker {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
            drain_grace: DEFAULT_DRAIN_GRACE,
        }
    }

    pub fn from_config(config: &FailoverConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Override how long to wait for output streams to close.
    pub fn with_drain_grace(mut self, grace: Duration) -> Self {
        self.drain_grace = grace;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl FailoverInvoker for CommandInvoker {
    fn describe(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("{:?}", part)
                } else {
                    part.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn invoke(&self) -> InvocationResult {
        let start = Instant::now();

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return InvocationResult {
                    outcome: Err(InvocationError::Launch {
                        program: self.program.clone(),
                        reason: e.to_string(),
                    }),
                    stdout: String::new(),
                    stderr: String::new(),
                    elapsed: start.elapsed(),
                };
            }
        };

        let pid = child.id();
        tracing::debug!(pid = ?pid, program = %self.program, "Failover process started");

        let stdout = child.stdout.take().map(|s| Capture::spawn(s, "stdout"));
        let stderr = child.stderr.take().map(|s| Capture::spawn(s, "stderr"));

        let outcome = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => exit_outcome(status),
            Ok(Err(e)) => Err(InvocationError::Wait(e.to_string())),
            Err(_) => {
                // kill() also reaps the child
                if let Err(e) = child.kill().await {
                    tracing::warn!(
                        pid = ?pid,
                        error = %e,
                        "Failed to kill timed-out failover process"
                    );
                }
                Err(InvocationError::Timeout(self.timeout.as_secs()))
            }
        };

        let stdout = match stdout {
            Some(capture) => capture.finish(self.drain_grace).await,
            None => String::new(),
        };
        let stderr = match stderr {
            Some(capture) => capture.finish(self.drain_grace).await,
            None => String::new(),
        };

        InvocationResult {
            outcome,
            stdout,
            stderr,
            elapsed: start.elapsed(),
        }
    }
}

fn exit_outcome(status: ExitStatus) -> Result<(), InvocationError> {
    if status.success() {
        Ok(())
    } else if let Some(code) = status.code() {
        Err(InvocationError::NonZeroExit(code))
    } else {
        Err(InvocationError::Signaled(exit_signal(&status)))
    }
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Background reader that accumulates one output stream.
///
/// Bytes land in a shared buffer as they arrive so that whatever was read
/// survives if the reader has to be abandoned.
struct Capture {
    stream: &'static str,
    buffer: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

impl Capture {
    fn spawn<R>(mut reader: R, stream: &'static str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buffer);

        let task = tokio::spawn(async move {
            let mut chunk = [0u8; 8192];
            loop {
                match reader.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => sink
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .extend_from_slice(&chunk[..n]),
                    Err(e) => {
                        tracing::warn!(stream, error = %e, "Failed to read failover output");
                        break;
                    }
                }
            }
        });

        Self {
            stream,
            buffer,
            task,
        }
    }

    async fn finish(mut self, grace: Duration) -> String {
        if tokio::time::timeout(grace, &mut self.task).await.is_err() {
            self.task.abort();
            tracing::warn!(
                stream = self.stream,
                grace_ms = grace.as_millis() as u64,
                "Output stream still open after the failover process ended, keeping partial output"
            );
        }

        let bytes = std::mem::take(&mut *self.buffer.lock().unwrap_or_else(|e| e.into_inner()));
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

//! Manual failover command

use crate::cli::{load_config, FailoverArgs};
use crate::failover::{CommandInvoker, FailoverInvoker};
use colored::Colorize;
use std::fmt::Write;

/// Handle `watchdog failover`
///
/// Runs the configured promotion procedure exactly once, ignoring the
/// cooldown. Returns the captured output on success; on failure the error
/// carries stdout, stderr and the failure reason.
pub async fn handle_failover(args: &FailoverArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    config.failover.validate()?;

    let invoker = CommandInvoker::from_config(&config.failover);
    if args.dry_run {
        return Ok(invoker.describe());
    }

    let result = invoker.invoke().await;

    let mut output = String::new();
    if !result.stdout.is_empty() {
        writeln!(output, "{}", result.stdout.trim_end())?;
    }

    match result.outcome {
        Ok(()) => {
            write!(
                output,
                "{} Failover completed in {:.1}s",
                "✓".green(),
                result.elapsed.as_secs_f64()
            )?;
            Ok(output)
        }
        Err(error) => {
            if !result.stderr.is_empty() {
                writeln!(output, "{}", result.stderr.trim_end())?;
            }
            write!(output, "failover procedure {}", error)?;
            Err(output.into())
        }
    }
}

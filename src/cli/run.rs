//! Run command implementation

use crate::cli::{load_config, RunArgs};
use crate::config::WatchdogConfig;
use crate::controller::Watchdog;
use crate::failover::CommandInvoker;
use crate::health::HttpProbe;
use crate::logging::init_tracing;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &RunArgs,
) -> Result<WatchdogConfig, Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;

    // CLI overrides (highest priority)
    if let Some(ref url) = args.url {
        config.probe.url = url.clone();
    }
    if let Some(interval) = args.interval {
        config.probe.interval_seconds = interval;
    }
    if let Some(threshold) = args.threshold {
        config.probe.failure_threshold = threshold;
    }
    if let Some(cooldown) = args.cooldown {
        config.failover.cooldown_seconds = cooldown;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if let Some(ref listen) = args.metrics_listen {
        config.metrics.enabled = true;
        config.metrics.listen = listen.clone();
    }

    Ok(config)
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

/// Main run command handler
pub async fn run_watchdog(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load, merge and validate configuration
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    // 2. Initialize tracing and, if requested, the exporter
    init_tracing(&config.logging)?;
    tracing::debug!(?config, "Loaded configuration");

    if config.metrics.enabled {
        crate::metrics::install_exporter(&config.metrics)?;
    }

    // 3. Wire probe and invoker into the loop
    let probe = Arc::new(HttpProbe::new(&config.probe)?);
    let invoker = Arc::new(CommandInvoker::from_config(&config.failover));
    let watchdog = Watchdog::new(&config, probe, invoker);
    watchdog.log_startup();

    // 4. Run until signalled
    let cancel_token = CancellationToken::new();
    let handle = watchdog.start(cancel_token.clone());

    shutdown_signal(cancel_token).await;

    tracing::info!("Waiting for watchdog loop to stop");
    handle.await?;

    tracing::info!("Watchdog stopped");
    Ok(())
}

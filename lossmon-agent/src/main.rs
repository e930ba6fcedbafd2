//! LossMon Agent - continuous packet-loss monitor
//!
//! Probes every configured host with a single ping, forever:
//! - Loss detected from the (localized) ping output text
//! - Alerts printed to stdout and appended to the log file
//! - Diagnostics go to stderr through tracing
//! - Ctrl+C stops the loop between (or during) probes

use anyhow::{Context, Result};
use lossmon_agent::{Monitor, MonitorConfig, STARTUP_BANNER};
use std::io::Write;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    // Initialize logging (stderr keeps stdout for alerts)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = MonitorConfig::config_file_path()?;
    let config = MonitorConfig::load_from(&config_path)
        .await
        .context("Failed to load configuration")?;
    info!("Using config {}\n{}", config_path.display(), config);

    let monitor = Monitor::from_config(&config, config.prober())
        .context("Invalid configuration")?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(STARTUP_BANNER.as_bytes())?;
    stdout.flush()?;
    drop(stdout);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            // Keep the sender alive so the monitor runs on
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let stats = monitor.run(shutdown_rx).await;
    info!("Final stats: {:?}", stats);
    Ok(())
}

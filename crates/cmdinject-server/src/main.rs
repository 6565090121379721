//! Command-injection lab server
//!
//! Binds `0.0.0.0:8080` by default and serves `/vuln` and `/safe` until
//! Ctrl+C or SIGTERM.

use cmdinject_core::{blacklist::DEFAULT_PATTERN, Blacklist, Config, ProcessExecutor};
use cmdinject_server::{start, AppState};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .enable_all()
        .thread_name("cmdinject-worker")
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG_FORMAT=json for JSON output
    let use_json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    if use_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }

    let config = Config::from_env();
    info!("Configuration loaded:");
    info!("  Listen: {}", config.bind_addr());
    info!("  Exec timeout: {:?}", config.exec_timeout());

    let blacklist = Blacklist::new(DEFAULT_PATTERN)?;
    let executor = Arc::new(ProcessExecutor::with_timeout(config.exec_timeout()));
    let state = AppState::new(blacklist, executor);

    let handle = match start(&config, state).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    shutdown_signal().await;
    handle.shutdown().await?;

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

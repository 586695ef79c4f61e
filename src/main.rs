//! OrderPulse Server: realtime order, payment, and return notifications.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use orderpulse_api::{AppState, build_app};
use orderpulse_core::config::{AppConfig, LogFormat};
use orderpulse_core::error::{AppError, ErrorKind};
use orderpulse_worker::{CronScheduler, RetentionJob};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("ORDERPULSE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.storage_backend,
        "Starting OrderPulse"
    );

    // ── Step 1: Stores, services, realtime engine ────────────────
    let state = AppState::from_config(config.clone()).await?;
    state.realtime.start();

    // ── Step 2: Scheduled retention ──────────────────────────────
    let retention = Arc::new(RetentionJob::new(
        Arc::clone(&state.store),
        config.notifications.retention_max_age(),
    ));
    let mut scheduler = CronScheduler::new().await?;
    scheduler
        .register_default_tasks(retention, &config.notifications)
        .await?;
    scheduler.start().await?;

    // ── Step 3: HTTP server ──────────────────────────────────────
    let app = build_app(state.clone());
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;
    tracing::info!(%addr, "OrderPulse server listening");

    // ── Step 4: Graceful shutdown ────────────────────────────────
    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let realtime = Arc::clone(&state.realtime);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            // Closing sessions lets WebSocket tasks finish so the server can drain.
            realtime.shutdown();
            let _ = signalled_tx.send(());
        })
        .into_future();

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    tokio::select! {
        result = server => result?,
        _ = async {
            let _ = signalled_rx.await;
            tokio::time::sleep(grace).await;
        } => tracing::warn!(grace_seconds = grace.as_secs(), "Server did not drain in time"),
    }

    state.realtime.shutdown();
    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!(error = %e, "Scheduler shutdown failed");
    }
    if let Some(database) = &state.database {
        database.close().await;
    }

    tracing::info!("OrderPulse server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

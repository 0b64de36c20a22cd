//! services/api/src/bin/api.rs

use axum::Router;
use portfolio_api::{
    adapters::db::DbAdapter,
    config::Config,
    error::ApiError,
    health::HealthReporter,
    tasks::{KeepAliveScheduler, SelfPingScheduler},
    web::{router, AppState, VersionTable},
};
use portfolio_core::service::PortfolioService;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let started = Instant::now();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database (with retry) & Optionally Run Migrations ---
    info!("Connecting to database...");
    let db_adapter = Arc::new(DbAdapter::connect(&config.database).await?);
    if config.database.run_migrations {
        info!("Running database migrations...");
        db_adapter.run_migrations().await?;
    }

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        portfolio: PortfolioService::new(db_adapter.clone()),
        health: HealthReporter::new(db_adapter.clone(), config.app_version.clone(), started),
        versions: VersionTable::new(config.default_api_version.clone()),
    });

    // --- 4. Start Background Timers ---
    let keep_alive = Arc::new(KeepAliveScheduler::new(
        db_adapter.clone(),
        config.keep_alive.clone(),
    ));
    keep_alive.start();
    let self_ping = Arc::new(SelfPingScheduler::new(config.self_ping.clone())?);
    self_ping.start();

    // --- 5. Create the Web Router & Serve ---
    let app: Router = router(app_state);
    info!("Starting server on {}", config.bind_address);
    info!("Swagger UI available at http://{}/swagger", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // --- 6. Tear Down ---
    info!("Shutting down...");
    keep_alive.stop().await;
    self_ping.stop().await;
    db_adapter.disconnect().await;

    served?;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

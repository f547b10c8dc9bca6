// Main entry point for the notification worker

use anyhow::{Context, Result};
use server_core::domains::notifications::NotificationIngress;
use server_core::kernel::ServerDeps;
use server_core::Config;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GridSense notification worker");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Wire up dependencies and start the pipeline. The asset domain layer
    // (hosted alongside this worker) feeds status-change facts through the
    // ingress handle.
    let deps = ServerDeps::postgres(pool, &config);
    let shutdown = CancellationToken::new();
    let (_ingress, worker) = NotificationIngress::start(deps, shutdown.clone());
    tracing::info!("Notification pipeline ready");

    // Run until interrupted
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutdown signal received");

    shutdown.cancel();
    worker.await.context("Ingress worker panicked")?;
    tracing::info!("Notification worker stopped");

    Ok(())
}

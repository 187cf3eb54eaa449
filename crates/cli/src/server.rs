//! # CLI Server
//!
//! Server startup and shutdown handling for the Ladle CLI.

use std::net::SocketAddr;

use anyhow::anyhow;
use error::Result;
use migration::{Migrator, MigratorTrait as _};
use redis::Client as RedisClient;
use server::{create_app_router, AppConfig, AppState};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    commands::ServeArgs,
    config::{parse_socket_addr, redis_url_from_env},
};

/// Starts the API server.
///
/// Connects to the database, applies any pending migrations, and serves
/// the router until a shutdown signal arrives.
pub async fn serve(args: &ServeArgs) -> Result<()> {
    info!(target: "serve", host = %args.host, port = %args.port, "Starting API server...");

    let db_config = migration::db::load_config_from_env();
    info!(target: "serve", database = %db_config.database, "Connecting to database...");
    let db = db_config.connect().await?;

    info!(target: "serve", "Running database migrations...");
    Migrator::up(&db, None)
        .await
        .map_err(|e| anyhow!("Failed to run database migrations: {}", e))?;
    info!(target: "serve", "Database migrations completed successfully");

    let redis_url = redis_url_from_env();
    let redis = RedisClient::open(redis_url.as_str()).map_err(|e| anyhow!("Failed to open Redis client: {}", e))?;

    let config = AppConfig::from_env()?;
    let state = AppState::new(db, redis, config);
    let app = create_app_router(state);

    let address = parse_socket_addr(&args.host, args.port)
        .map_err(|e| anyhow!("Invalid address {}:{}: {}", args.host, args.port, e))?;
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", address, e))?;

    info!(target: "serve", %address, "Starting HTTP server...");

    Ok(axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow!("HTTP server error: {}", e))?)
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

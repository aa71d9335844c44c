//! Stockroom API server.
//!
//! Loads configuration, opens (and migrates) the database, then serves
//! HTTP until Ctrl+C or SIGTERM.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockroom_api::config::AppConfig;
use stockroom_api::{router, AppState};
use stockroom_db::migrations::migration_status;
use stockroom_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=debug", config.log_level).into()),
        )
        .init();

    info!("Starting {} v{}", config.app_name, env!("CARGO_PKG_VERSION"));
    info!(path = %config.database_path, "Opening database");

    let db = Database::new(config.db_config())
        .await
        .context("failed to open database")?;

    let (total, applied) = migration_status(db.pool()).await?;
    info!(applied, total, "Database schema ready");

    let addr = config.bind_addr();
    let app = router(AppState::new(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

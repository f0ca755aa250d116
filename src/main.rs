use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use smarthome_api::config::AppConfig;
use smarthome_api::database::{apply_migrations, Database};
use smarthome_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,smarthome_api=debug")),
        )
        .init();

    let config = AppConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
    info!(
        environment = ?config.environment,
        port = config.api.port,
        hook_configured = config.automation.hook_command.is_some(),
        "Starting SmartHome API v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db = Database::connect(&config.database)
        .await
        .context("failed to open database")?;
    let applied = apply_migrations(db.pool()).await.context("failed to migrate database")?;
    if applied > 0 {
        info!(applied, "Applied schema migrations");
    }

    let port = config.api.port;
    let state = AppState::new(config, db.clone()).context("failed to initialise session keys")?;

    let purged = state.accounts().purge_expired_sessions().await?;
    if purged > 0 {
        info!(purged, "Removed expired sessions");
    }

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("SmartHome API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

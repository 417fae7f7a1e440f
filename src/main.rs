use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use smart_notes_api::config::AppConfig;
use smart_notes_api::database;
use smart_notes_api::llm::GroqBackend;
use smart_notes_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Smart Notes API in {:?} mode", config.environment);

    let store = database::open_store(&config.database)
        .await
        .context("failed to open database")?;
    let completions = GroqBackend::new(config.llm.clone()).context("failed to set up completion backend")?;

    let bind_addr = config.bind_addr()?;
    let state = AppState::new(config, store, Arc::new(completions));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Smart Notes API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

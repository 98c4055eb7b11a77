mod config;
mod errors;
mod guidance;
mod llm_client;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::store::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Startup Guide API v{}", env!("CARGO_PKG_VERSION"));

    match config.openrouter_api_key.as_deref() {
        None => warn!("OPENROUTER_API_KEY not set; requests must carry their own key"),
        Some(key) if !llm_client::is_plausible_api_key(key) => {
            warn!("OPENROUTER_API_KEY does not look like an OpenRouter key")
        }
        Some(_) => {}
    }

    let llm = LlmClient::new(
        config.openrouter_api_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("failed to build HTTP client")?;
    info!(
        "LLM client initialized (default model: {}, streaming: {})",
        config.default_model, config.enable_streaming
    );

    let state = AppState {
        llm,
        sessions: SessionStore::new(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

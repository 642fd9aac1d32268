//! # hzk-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to configurable port (default 5000).

use hzk_api::state::{AppConfig, AppState};
use hzk_chat::{ChatClient, ChatConfig};
use hzk_prover::{Prover, ProverConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A local .env is optional; real environment variables take precedence.
    let dotenv = dotenvy::dotenv();

    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match dotenv {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {e}"),
    }

    let config = AppConfig::from_env();
    tracing::info!(
        idle_secs = config.sessions.idle_ttl.as_secs(),
        max_sessions = config.sessions.max_sessions,
        "Chat session limits"
    );

    let prover_config = ProverConfig::from_env();
    tracing::info!(
        assets = %prover_config.assets_dir.display(),
        timeout_secs = prover_config.timeout.as_secs(),
        "Prover configured"
    );
    let prover = Prover::new(prover_config);
    prover.registry().audit();

    let chat_config = ChatConfig::from_env().map_err(|e| {
        tracing::error!("Chat client configuration invalid: {e}");
        e
    })?;
    if chat_config.api_key.is_none() {
        tracing::warn!("API_KEY is not set. /query will fail until it is configured.");
    }
    tracing::info!(model = %chat_config.model, "Chat client configured");
    let chat = ChatClient::new(chat_config)?;

    let state = AppState::new(config.clone(), prover, chat);
    let app = hzk_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("healthzk API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

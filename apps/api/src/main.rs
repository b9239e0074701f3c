use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crucible_api::config::Config;
use crucible_api::interview::store::SessionStore;
use crucible_api::llm_client::{self, LlmClient};
use crucible_api::routes::build_router;
use crucible_api::state::AppState;

/// Eviction cadence for the session sweeper.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("crucible_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Crucible API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
    ));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize the session store and its eviction task
    let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_secs));
    sessions.spawn_sweeper(SWEEP_INTERVAL);
    info!("Session store initialized (ttl: {}s)", config.session_ttl_secs);

    // Build app state
    let state = AppState {
        llm,
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

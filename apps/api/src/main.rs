mod config;
mod cv;
mod db;
mod errors;
mod fit;
mod jobs;
mod llm_client;
mod optimizer;
mod render;
mod reviews;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::cv::store::CvStore;
use crate::db::create_pool;
use crate::fit::LlmFitAnalyzer;
use crate::jobs::reed::ReedClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
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

    info!("Starting jobdeck API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite (reviews are the only durable data)
    let db = create_pool(&config.database_url).await?;

    // Initialize the Reed job board client
    let jobs = ReedClient::new(config.reed_api_key.clone());
    if !jobs.is_configured() {
        warn!("REED_API_KEY not set — job search will return an error until configured");
    }

    // Initialize the LLM client
    let llm = LlmClient::new(config.github_token.clone());
    if !llm.is_configured() {
        warn!("GITHUB_TOKEN not set — AI features will be unavailable");
    }

    // Fit analyzer behind the trait seam so tests can swap in a stub
    let fit_analyzer = Arc::new(LlmFitAnalyzer::new(llm.clone()));

    // Session store for uploaded CV profiles (in-memory, 1h TTL)
    let cv_store = CvStore::new();

    let state = AppState {
        db,
        jobs,
        llm,
        cv_store,
        fit_analyzer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

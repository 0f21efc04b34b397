mod analysis;
mod clients;
mod config;
mod errors;
mod extraction;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::MatchAnalyzer;
use crate::clients::{build_http_client, GeminiClient, HuggingFaceClient};
use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume match API v{}", env!("CARGO_PKG_VERSION"));

    // Upstream clients share one connection pool
    let http = build_http_client(config.upstream_timeout)?;

    if config.hf_api_key.is_none() {
        warn!("HF_API_KEY not set; similarity scores will use word overlap");
    }
    let similarity = Arc::new(HuggingFaceClient::new(
        http.clone(),
        &config.hf_api_url,
        &config.hf_similarity_model,
        config.hf_api_key.clone(),
    ));
    info!("Similarity client initialized (model: {})", config.hf_similarity_model);

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; feedback will use keyword templates");
    }
    let completion = Arc::new(GeminiClient::new(
        http,
        &config.gemini_api_url,
        &config.gemini_model,
        config.gemini_api_key.clone(),
    ));
    info!("Completion client initialized (model: {})", config.gemini_model);

    let extractor_config = config.extractor_config();
    tokio::fs::create_dir_all(&extractor_config.upload_dir).await?;
    info!(
        "Uploads staged in {} (limit {})",
        extractor_config.upload_dir.display(),
        extractor_config.upload_limit_label()
    );

    let state = AppState {
        extractor: Arc::new(TextExtractor::new(extractor_config)),
        analyzer: Arc::new(MatchAnalyzer::new(similarity, completion)),
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

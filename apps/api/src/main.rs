mod config;
mod errors;
mod llm_client;
mod matching;
mod ocr;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{ChatModel, LlmClient};
use crate::matching::aligner::{LiteralSkillAligner, LlmSkillAligner};
use crate::matching::extractor::{KeywordSkillExtractor, LlmSkillExtractor};
use crate::matching::orchestrator::Matcher;
use crate::ocr::LlmTextRecognizer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting skillmatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client: one instance shared by extraction, alignment and OCR
    let llm: Arc<dyn ChatModel> = Arc::new(LlmClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_api_url.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let matcher = if config.enable_llm_matching {
        info!("Skill matching backend: llm (keyword/literal fallback)");
        Matcher::new(
            Arc::new(LlmSkillExtractor::new(llm.clone())),
            Arc::new(LlmSkillAligner::new(llm.clone())),
        )
    } else {
        info!("Skill matching backend: keyword/literal only");
        Matcher::new(Arc::new(KeywordSkillExtractor), Arc::new(LiteralSkillAligner))
    };

    let state = AppState {
        config: config.clone(),
        matcher,
        recognizer: Arc::new(LlmTextRecognizer::new(llm)),
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

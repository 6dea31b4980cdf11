mod config;
mod document;
mod errors;
mod export;
mod history;
mod llm_client;
mod models;
mod questions;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, QuestionTransport};
use crate::document::DocumentParser;
use crate::history::store::{MemoryHistoryStore, RedisHistoryStore};
use crate::history::{HistoryRepository, HistoryStore};
use crate::llm_client::LlmClient;
use crate::questions::generator::QuestionGenerator;
use crate::questions::source::{LlmQuestionSource, QuestionSource, RouteQuestionSource};
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

    info!("Starting Questioner API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.llm_settings())?;
    info!("LLM client initialized (model: {})", llm.model());
    let llm_source: Arc<dyn QuestionSource> = Arc::new(LlmQuestionSource::new(llm));

    // Pick the transport used by the generation pipeline
    let pipeline_source: Arc<dyn QuestionSource> = match &config.transport {
        QuestionTransport::Direct => {
            info!("Question transport: direct");
            llm_source.clone()
        }
        QuestionTransport::Internal { base_url } => {
            info!("Question transport: internal route at {base_url}");
            Arc::new(RouteQuestionSource::new(base_url, config.llm_timeout())?)
        }
    };

    // Initialize history storage
    let store: Arc<dyn HistoryStore> = match &config.redis_url {
        Some(url) => {
            let redis = redis::Client::open(url.as_str())?;
            info!("Redis history store initialized (key: {})", config.history_key);
            Arc::new(RedisHistoryStore::new(redis, config.history_key.clone()))
        }
        None => {
            info!("REDIS_URL not set; history kept in memory");
            Arc::new(MemoryHistoryStore::default())
        }
    };
    let history = HistoryRepository::new(store);

    let generator = QuestionGenerator::new(
        Arc::new(DocumentParser),
        pipeline_source,
        history.clone(),
    );

    // Build app state
    let state = AppState {
        llm_source,
        generator: Arc::new(generator),
        history,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

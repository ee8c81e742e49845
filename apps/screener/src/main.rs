mod config;
mod errors;
mod llm_client;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::screening::orchestrator::Orchestrator;
use crate::screening::report::JsonReportExporter;
use crate::screening::validator::AdmissionLimits;
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

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize analysis client
    let client = GeminiClient::new(&config).context("Failed to build HTTP client")?;
    info!(
        "Analysis client initialized (model: {}, timeout: {:?})",
        config.gemini_model, config.analysis_timeout
    );

    let limits = AdmissionLimits::from(&config);
    info!(
        "Admission limits: {} MB per file, {} files in bulk mode",
        limits.max_file_size_mb, limits.max_bulk_files
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        orchestrator: Orchestrator::new(Arc::new(client), limits),
        exporter: Arc::new(JsonReportExporter),
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

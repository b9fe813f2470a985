mod analysis;
mod config;
mod errors;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::taxonomy::Taxonomy;
use crate::analysis::AnalysisEngine;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer API v{}", env!("CARGO_PKG_VERSION"));

    // Skill taxonomy: a file override or the bundled copy. Without it no analysis can run.
    let taxonomy = match &config.taxonomy_path {
        Some(path) => Taxonomy::load(path),
        None => Taxonomy::bundled(),
    }
    .context("Failed to load skill taxonomy")?;
    info!(
        "Skill taxonomy v{} ready ({} skills, {} baseline)",
        taxonomy.version(),
        taxonomy.skill_count(),
        taxonomy.baseline().len()
    );

    let engine = AnalysisEngine::new(Arc::new(taxonomy), config.engine_config());
    info!(
        "Analysis engine ready (max upload {} MB, {} recommendations, summary {})",
        config.max_upload_size_mb,
        config.max_recommendations,
        if config.enable_summary_generation { "on" } else { "off" }
    );

    // Build app state
    let state = AppState {
        analyzer: Arc::new(engine),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

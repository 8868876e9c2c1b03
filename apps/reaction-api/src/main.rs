//! Reaction-time API server
//!
//! Provides HTTP endpoints for:
//! - Issuing a per-browser user identifier and serving the test page
//! - Submitting reaction-time samples
//! - Reading population statistics

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod handlers;
mod identity;
mod models;
mod state;

use config::Config;
use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Test page and identity issuance
        .route("/", get(handlers::index))
        // Statistics
        .route("/global_stats", get(handlers::global_stats))
        .route("/submit", post(handlers::submit))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::parse();

    // Initialize tracing
    let default_level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("reaction_api={}", default_level).parse()?)
                .add_directive(format!("reaction_core={}", default_level).parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Initialize application state
    info!("Initializing reaction-time API...");
    let bounds = config.bounds()?;
    let state = AppState::new(
        &config.store_config(),
        bounds,
        config.cookie_max_age_secs(),
    )
    .await?;
    let state = Arc::new(state);

    let app = build_router(state);

    let addr = config.bind_addr()?;
    info!("Starting reaction-time API on http://{}", addr);
    info!("Accepting values in [{}, {}] ms", bounds.min, bounds.max);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

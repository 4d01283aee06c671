//! datatier-server — HTTP API for column sensitivity classification.

mod config;
mod health;
mod http_api;
mod metrics;

use anyhow::Result;
use clap::Parser;
use datatier_ai::{ClassificationEngine, RemoteConfig};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use config::ServerArgs;
use metrics::ServerMetrics;

/// State shared by every handler.
pub struct AppState {
    pub engine: ClassificationEngine,
    pub metrics: ServerMetrics,
}

pub fn app(state: Arc<AppState>) -> axum::Router {
    http_api::classify_router(state.clone())
        .merge(health::health_router(state))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = ServerArgs::parse();
    let remote = RemoteConfig::from_env()?;
    info!("Remote classification config: {:?}", remote);

    let state = Arc::new(AppState {
        engine: ClassificationEngine::new(remote),
        metrics: ServerMetrics::new(),
    });

    let addr = args.bind_addr();
    info!("Starting datatier server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

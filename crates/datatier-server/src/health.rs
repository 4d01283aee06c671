//! Health, readiness and metrics endpoints (Axum).

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppState;

pub fn health_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn ready(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "status": "ready", "strategy": state.engine.strategy_name() }))
}

async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.encode()
}

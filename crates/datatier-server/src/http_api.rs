//! HTTP API for classifying columns.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use datatier_core::{
    extract_samples, ClassificationRequest, ClassificationResult, Provenance, UPLOADED_FILE,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnInput {
    pub name: String,
    #[serde(default)]
    pub samples: Vec<String>,
    pub source_name: Option<String>,
    pub source_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyColumnsRequest {
    pub columns: Vec<ColumnInput>,
}

/// A small tabular extract: header row plus data rows. `null` cells are
/// treated as missing.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyTableRequest {
    pub source_name: Option<String>,
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Option<Value>>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub batch_id: Uuid,
    pub classified_at: DateTime<Utc>,
    pub results: Vec<ClassificationResult>,
}

type ApiError = (StatusCode, String);

// ---------------------------------------------------------------------------
// Request conversion
// ---------------------------------------------------------------------------

fn column_request(column: ColumnInput) -> Result<ClassificationRequest, ApiError> {
    let samples = extract_samples(column.samples.into_iter().map(Some));
    let request = ClassificationRequest::new(column.name, samples)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let provenance = Provenance::new(
        column
            .source_name
            .unwrap_or_else(|| request.column_name().to_string()),
        column.source_type.unwrap_or_else(|| UPLOADED_FILE.to_string()),
    );
    Ok(request.with_provenance(provenance))
}

fn cell_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn table_requests(table: ClassifyTableRequest) -> Result<Vec<ClassificationRequest>, ApiError> {
    let ClassifyTableRequest {
        source_name,
        headers,
        rows,
    } = table;

    headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let cells = rows
                .iter()
                .map(|row| row.get(idx).cloned().flatten().and_then(cell_text));
            let samples = extract_samples(cells);
            let request = ClassificationRequest::new(header, samples).map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("column {}: {}", idx + 1, e),
                )
            })?;
            Ok(match &source_name {
                Some(name) => request.with_provenance(Provenance::new(name.clone(), UPLOADED_FILE)),
                None => request,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn run_batch(state: &AppState, requests: Vec<ClassificationRequest>) -> ClassifyResponse {
    let batch_id = Uuid::new_v4();
    info!(
        "Classifying {} columns (batch {}, strategy {})",
        requests.len(),
        batch_id,
        state.engine.strategy_name()
    );

    let results = state.engine.classify_all(&requests).await;
    state.metrics.record_batch(&results);

    ClassifyResponse {
        batch_id,
        classified_at: Utc::now(),
        results,
    }
}

/// POST /api/classify — classify columns with caller-supplied samples.
async fn classify_columns(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassifyColumnsRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let requests = req
        .columns
        .into_iter()
        .map(column_request)
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|(_, msg)| {
            warn!("Rejected classification request: {}", msg);
            state.metrics.rejected_requests.inc();
        })?;

    Ok(Json(run_batch(&state, requests).await))
}

/// POST /api/classify/table — sample each column of a table, then classify.
async fn classify_table(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassifyTableRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let requests = table_requests(req).inspect_err(|(_, msg)| {
        warn!("Rejected table classification request: {}", msg);
        state.metrics.rejected_requests.inc();
    })?;

    Ok(Json(run_batch(&state, requests).await))
}

/// Build the classification router.
pub fn classify_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/classify", post(classify_columns))
        .route("/api/classify/table", post(classify_table))
        .with_state(state)
}

//! Code allocation and ledger handlers.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ApiError;
use crate::error::{ErrorKind, LabelError};
use crate::ledger::LabelRecord;

use super::super::state::AppState;

const DEFAULT_RECENT_LIMIT: usize = 50;
const MAX_RECENT_LIMIT: usize = 1000;

/// Body for POST /api/labels/allocate.
#[derive(Debug, Deserialize)]
pub struct AllocateRequest {
    pub prefix: String,
    /// Signed so that negative counts get a validation error, not a parse error
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct AllocateResponse {
    pub codes: Vec<String>,
}

/// Handle POST /api/labels/allocate - reserve a block of new codes.
pub async fn allocate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AllocateRequest>, JsonRejection>,
) -> Result<Json<AllocateResponse>, ApiError> {
    let Json(req) = payload?;
    let count = u32::try_from(req.count).map_err(|_| {
        LabelError::validation(format!(
            "count must be between 1 and {}, got {}",
            state.allocator.config().max_batch,
            req.count
        ))
    })?;

    let allocator = state.allocator.clone();
    let codes = tokio::task::spawn_blocking(move || allocator.allocate(&req.prefix, count))
        .await
        .map_err(|e| ApiError::task(e, ErrorKind::Persistence))??;

    Ok(Json(AllocateResponse {
        codes: codes.iter().map(ToString::to_string).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// Handle GET /api/labels - most recent ledger records.
pub async fn recent(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<Vec<LabelRecord>>, ApiError> {
    let Query(query) = query?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);

    let ledger = state.allocator.ledger().clone();
    let records = tokio::task::spawn_blocking(move || ledger.recent(limit))
        .await
        .map_err(|e| ApiError::task(e, ErrorKind::Persistence))??;

    Ok(Json(records))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total: u64,
    pub code_width: u8,
    pub max_batch: u32,
}

/// Handle GET /api/labels/stats.
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, ApiError> {
    let ledger = state.allocator.ledger().clone();
    let stats = tokio::task::spawn_blocking(move || ledger.stats())
        .await
        .map_err(|e| ApiError::task(e, ErrorKind::Persistence))??;

    let config = state.allocator.config();
    Ok(Json(StatsResponse {
        total: stats.total,
        code_width: config.width.digits(),
        max_batch: config.max_batch,
    }))
}

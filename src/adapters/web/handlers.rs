//! HTTP request handlers for the JSON API.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::domain::csv_import::parse_trades;
use crate::domain::error::JournalError;
use crate::domain::summary::{SummaryReport, compute_summary};
use crate::domain::trade::{Trade, TradeInput};

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub status: &'static str,
}

pub async fn create_trade(
    State(state): State<Arc<AppState>>,
    Json(input): Json<TradeInput>,
) -> Result<(StatusCode, Json<Trade>), ApiError> {
    let trade = state.store.insert(&input)?;
    info!(id = trade.id, symbol = %trade.symbol, "trade created");
    Ok((StatusCode::CREATED, Json(trade)))
}

/// Accepts a raw CSV document as the request body and persists every row
/// that normalizes. A document yielding zero trades is a client error.
pub async fn import_csv(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ImportResponse>, ApiError> {
    let inputs = parse_trades(&body)?;
    if inputs.is_empty() {
        return Err(JournalError::EmptyImport.into());
    }

    for input in &inputs {
        state.store.insert(input)?;
    }

    info!(imported = inputs.len(), "csv import complete");
    Ok(Json(ImportResponse {
        imported: inputs.len(),
    }))
}

pub async fn list_trades(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Trade>>, ApiError> {
    let trades = state.store.list()?;
    Ok(Json(trades))
}

pub async fn get_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Trade>, ApiError> {
    let trade = state.store.get(id)?;
    Ok(Json(trade))
}

pub async fn update_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<TradeInput>,
) -> Result<Json<Trade>, ApiError> {
    let trade = state.store.update(id, &input)?;
    info!(id, "trade updated");
    Ok(Json(trade))
}

pub async fn delete_trade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.store.delete(id)?;
    info!(id, "trade deleted");
    Ok(Json(DeleteResponse { status: "deleted" }))
}

pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryReport>, ApiError> {
    let trades = state.store.list()?;
    Ok(Json(compute_summary(&trades)))
}

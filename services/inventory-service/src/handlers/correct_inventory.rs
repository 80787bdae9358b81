use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cellar_domain::commands::RecordCorrectionCommand;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::{ledger_error_response, ErrorResponse, StockResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CorrectInventoryRequest {
    /// The drink event whose quantity was mis-recorded.
    pub original_drink_event_id: i64,

    /// Bottles to restore (positive) or additionally remove (negative).
    pub error_quantity: i32,

    pub event_date: Option<DateTime<Utc>>,
}

/// Handle recording a consumption correction
pub async fn handle(
    State(state): State<AppState>,
    Path(wine_id): Path<i64>,
    Json(req): Json<CorrectInventoryRequest>,
) -> Result<(StatusCode, Json<StockResponse>), (StatusCode, Json<ErrorResponse>)> {
    info!(
        "Received correction of {} bottles for wine {} against event {}",
        req.error_quantity, wine_id, req.original_drink_event_id
    );

    let cmd = RecordCorrectionCommand {
        wine_id,
        original_drink_event_id: req.original_drink_event_id,
        error_quantity: req.error_quantity,
        event_date: req.event_date,
    };

    let summary = state
        .ledger
        .record_correction(cmd)
        .await
        .map_err(ledger_error_response)?;

    Ok((StatusCode::CREATED, Json(StockResponse::new(wine_id, summary))))
}

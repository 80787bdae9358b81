use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cellar_domain::commands::RecordConsumptionCommand;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::{ledger_error_response, ErrorResponse, StockResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct DrinkInventoryRequest {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    pub event_date: Option<DateTime<Utc>>,
}

/// Handle recording a consumption
pub async fn handle(
    State(state): State<AppState>,
    Path(wine_id): Path<i64>,
    Json(req): Json<DrinkInventoryRequest>,
) -> Result<(StatusCode, Json<StockResponse>), (StatusCode, Json<ErrorResponse>)> {
    info!(
        "Received consumption of {} bottles for wine {}",
        req.quantity, wine_id
    );

    if let Err(e) = req.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Validation error: {}", e),
            }),
        ));
    }

    let cmd = RecordConsumptionCommand {
        wine_id,
        quantity: req.quantity,
        event_date: req.event_date,
    };

    let summary = state
        .ledger
        .record_consumption(cmd)
        .await
        .map_err(ledger_error_response)?;

    Ok((StatusCode::CREATED, Json(StockResponse::new(wine_id, summary))))
}

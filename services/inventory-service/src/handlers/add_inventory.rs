use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cellar_domain::commands::RecordAcquisitionCommand;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::{ledger_error_response, ErrorResponse, StockResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct AddInventoryRequest {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    pub acquisition_type: Option<String>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    pub bought_at: Option<String>,

    pub event_date: Option<DateTime<Utc>>,
}

/// Handle recording an acquisition
pub async fn handle(
    State(state): State<AppState>,
    Path(wine_id): Path<i64>,
    Json(req): Json<AddInventoryRequest>,
) -> Result<(StatusCode, Json<StockResponse>), (StatusCode, Json<ErrorResponse>)> {
    info!(
        "Received acquisition of {} bottles for wine {}",
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

    let cmd = RecordAcquisitionCommand {
        wine_id,
        quantity: req.quantity,
        acquisition_type: req.acquisition_type,
        price: req.price,
        bought_at: req.bought_at,
        event_date: req.event_date,
    };

    let summary = state
        .ledger
        .record_acquisition(cmd)
        .await
        .map_err(ledger_error_response)?;

    Ok((StatusCode::CREATED, Json(StockResponse::new(wine_id, summary))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation_rejects_zero_quantity() {
        let req = AddInventoryRequest {
            quantity: 0,
            acquisition_type: None,
            price: None,
            bought_at: None,
            event_date: None,
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_validation_accepts_typical_purchase() {
        let req = AddInventoryRequest {
            quantity: 6,
            acquisition_type: Some("purchase".to_string()),
            price: Some(22.50),
            bought_at: Some("2024-06-12".to_string()),
            event_date: None,
        };

        assert!(req.validate().is_ok());
    }
}

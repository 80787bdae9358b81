pub mod add_inventory;
pub mod correct_inventory;
pub mod create_wine;
pub mod drink_inventory;
pub mod get_stock;
pub mod get_wine;
pub mod health;

use axum::{http::StatusCode, Json};
use cellar_domain::StockSummary;
use cellar_ledger::LedgerError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Stock summary as returned by every inventory endpoint.
#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub wine_id: i64,
    pub current_stock: i64,
    pub total_acquired: i64,
    pub total_consumed: i64,
    pub last_event_at: Option<DateTime<Utc>>,
}

impl StockResponse {
    pub fn new(wine_id: i64, summary: StockSummary) -> Self {
        Self {
            wine_id,
            current_stock: summary.current_stock,
            total_acquired: summary.total_acquired,
            total_consumed: summary.total_consumed,
            last_event_at: summary.last_event_at,
        }
    }
}

/// Map a ledger error onto the HTTP surface.
pub fn ledger_error_response(err: LedgerError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        LedgerError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
        LedgerError::InsufficientStock { .. } => StatusCode::CONFLICT,
        LedgerError::WineNotFound(_) | LedgerError::DrinkEventNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        LedgerError::Storage(_) | LedgerError::InconsistentHistory(_) => {
            error!("Ledger operation failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

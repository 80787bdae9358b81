use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{ledger_error_response, ErrorResponse, StockResponse};
use crate::state::AppState;

/// Handle a stock query. A wine with no events reports zero stock; this is
/// not an error.
pub async fn handle(
    State(state): State<AppState>,
    Path(wine_id): Path<i64>,
) -> Result<(StatusCode, Json<StockResponse>), (StatusCode, Json<ErrorResponse>)> {
    let summary = state
        .ledger
        .get_stock(wine_id)
        .await
        .map_err(ledger_error_response)?;

    Ok((StatusCode::OK, Json(StockResponse::new(wine_id, summary))))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cellar_domain::Wine;

use super::ErrorResponse;
use crate::state::AppState;

/// Fetch a wine from the catalog.
pub async fn handle(
    State(state): State<AppState>,
    Path(wine_id): Path<i64>,
) -> Result<(StatusCode, Json<Wine>), (StatusCode, Json<ErrorResponse>)> {
    let wine = state.catalog.get(wine_id).await.map_err(|e| {
        tracing::error!("Failed to load wine {}: {}", wine_id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to load wine: {}", e),
            }),
        )
    })?;

    match wine {
        Some(wine) => Ok((StatusCode::OK, Json(wine))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("wine {} does not exist", wine_id),
            }),
        )),
    }
}

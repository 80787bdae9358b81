use axum::{extract::State, http::StatusCode, Json};
use cellar_domain::{NewWine, Wine, WineType};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateWineRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "Producer cannot be empty"))]
    pub producer: String,

    pub vintage: Option<i32>,
    pub wine_type: Option<WineType>,
}

/// Register a wine so the ledger can accept events for it. The full catalog
/// CRUD lives in the collection application; this is the minimum the
/// inventory demo needs.
pub async fn handle(
    State(state): State<AppState>,
    Json(req): Json<CreateWineRequest>,
) -> Result<(StatusCode, Json<Wine>), (StatusCode, Json<ErrorResponse>)> {
    if let Err(e) = req.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Validation error: {}", e),
            }),
        ));
    }

    let wine = state
        .catalog
        .register(NewWine {
            name: req.name,
            producer: req.producer,
            vintage: req.vintage,
            wine_type: req.wine_type,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to register wine: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to register wine: {}", e),
                }),
            )
        })?;

    info!("Registered wine {} ({})", wine.id, wine.name);

    Ok((StatusCode::CREATED, Json(wine)))
}

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    add_inventory, correct_inventory, create_wine, drink_inventory, get_stock, get_wine, health,
};
use crate::state::AppState;

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/wines", post(create_wine::handle))
        .route("/api/v1/wines/:id", get(get_wine::handle))
        .route("/api/v1/wines/:id/inventory", get(get_stock::handle))
        .route("/api/v1/wines/:id/inventory/add", post(add_inventory::handle))
        .route(
            "/api/v1/wines/:id/inventory/drink",
            post(drink_inventory::handle),
        )
        .route(
            "/api/v1/wines/:id/inventory/correct",
            post(correct_inventory::handle),
        )
        .with_state(state)
}

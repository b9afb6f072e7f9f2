use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::models;
use super::state::AppState;

/// Create the registry router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/models",
            post(models::create_model).get(models::list_models),
        )
        // Registered before `{id}` so the literal segment wins
        .route("/api/models/enums", get(models::list_enums))
        .route(
            "/api/models/{id}",
            get(models::get_model).put(models::update_model),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

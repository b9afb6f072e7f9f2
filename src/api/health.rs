//! Health check endpoint

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;
use crate::domain::{ModelRegistryClient, QueryState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub models: usize,
}

/// Returns 200 while the registry can be read
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.registry.list_all(&QueryState::new()).await {
        Ok(models) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                version: env!("CARGO_PKG_VERSION"),
                models: models.len(),
            }),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                version: env!("CARGO_PKG_VERSION"),
                models: 0,
            }),
        ),
    }
}

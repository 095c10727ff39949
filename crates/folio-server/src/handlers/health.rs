use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn down() -> Self {
        Self {
            status: "DOWN".to_string(),
        }
    }
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "UP".to_string(),
        }
    }
}

/// GET /health: UP mientras el store responda dentro de su deadline.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.catalog().store_health().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::default())),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::down()))
        },
    }
}

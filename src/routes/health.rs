use crate::models::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::Utc;

/// Liveness probe; never touches upstream or the cache
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.to_string(),
    })
}

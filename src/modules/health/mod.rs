use axum::{Json, Router, routing::get};
use wayfare_models::HealthResponse;

use crate::state::AppState;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub fn init_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

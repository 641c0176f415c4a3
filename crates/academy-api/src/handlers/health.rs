//! Health check handler.

use axum::Json;
use axum::extract::State;

use academy_database::StoreHealth;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// `status` is `degraded` while the database does not answer.
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let database = state.repos.health().await;
    let status = match database {
        StoreHealth::Unavailable => "degraded",
        StoreHealth::Connected | StoreHealth::Memory => "ok",
    };
    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
    }))
}

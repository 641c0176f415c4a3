//! Ladder authorization handlers.

use axum::Json;
use axum::extract::State;

use academy_core::error::AppError;
use academy_entity::workflow::LadderAuthorization;

use crate::dto::request::LadderReviewRequest;
use crate::dto::response::ApiResponse;
use crate::extractors::{AuthUser, SessionToken, ValidatedJson};
use crate::state::AppState;

/// POST /api/ladder/request
pub async fn request(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<ApiResponse<LadderAuthorization>>, AppError> {
    let ctx = state.guard.require_learner(token.as_deref()).await?;
    let row = state.services.ladder.request(&ctx).await?;
    Ok(Json(ApiResponse::ok(row)))
}

/// GET /api/ladder/status
pub async fn status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Option<LadderAuthorization>>>, AppError> {
    let row = state.services.ladder.status(&auth).await?;
    Ok(Json(ApiResponse::ok(row)))
}

/// GET /api/review/ladder
pub async fn list_pending(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<ApiResponse<Vec<LadderAuthorization>>>, AppError> {
    let ctx = state.guard.require_manager(token.as_deref()).await?;
    let rows = state.services.ladder.list_pending(&ctx).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// POST /api/review/ladder
///
/// All-or-nothing: one out-of-scope user rejects the whole batch.
pub async fn review(
    State(state): State<AppState>,
    token: SessionToken,
    ValidatedJson(req): ValidatedJson<LadderReviewRequest>,
) -> Result<Json<ApiResponse<Vec<LadderAuthorization>>>, AppError> {
    let ctx = state.guard.require_manager(token.as_deref()).await?;
    let rows = state
        .services
        .ladder
        .review(&ctx, &req.user_ids, req.decision, req.reason)
        .await?;
    Ok(Json(ApiResponse::ok(rows)))
}

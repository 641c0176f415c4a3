//! Restricted file access handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use academy_core::error::AppError;
use academy_entity::workflow::FileAccessRequest;

use crate::dto::request::FileReviewRequest;
use crate::dto::response::{ApiResponse, FlagResponse};
use crate::extractors::{AuthUser, SessionToken, ValidatedJson};
use crate::state::AppState;

/// GET /api/files/{id}/access
pub async fn has_access(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<Uuid>,
) -> Result<Json<ApiResponse<FlagResponse>>, AppError> {
    let value = state.services.files.has_access(&auth, file_id).await?;
    Ok(Json(ApiResponse::ok(FlagResponse { value })))
}

/// POST /api/files/{id}/access
pub async fn request_access(
    State(state): State<AppState>,
    token: SessionToken,
    Path(file_id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileAccessRequest>>, AppError> {
    let ctx = state.guard.require_learner(token.as_deref()).await?;
    let row = state.services.files.request(&ctx, file_id).await?;
    Ok(Json(ApiResponse::ok(row)))
}

/// GET /api/review/files
pub async fn list_pending(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<ApiResponse<Vec<FileAccessRequest>>>, AppError> {
    let ctx = state.guard.require_manager(token.as_deref()).await?;
    let rows = state.services.files.list_pending(&ctx).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// POST /api/review/files
pub async fn review(
    State(state): State<AppState>,
    token: SessionToken,
    ValidatedJson(req): ValidatedJson<FileReviewRequest>,
) -> Result<Json<ApiResponse<FileAccessRequest>>, AppError> {
    let ctx = state.guard.require_manager(token.as_deref()).await?;
    let row = state
        .services
        .files
        .review(&ctx, req.user_id, req.file_id, req.decision, req.reason)
        .await?;
    Ok(Json(ApiResponse::ok(row)))
}

//! Course access handlers.

use axum::Json;
use axum::extract::{Path, State};

use academy_core::error::AppError;
use academy_entity::workflow::{CourseAccessRequest, ProgressSummary};

use crate::dto::request::{CourseReviewRequest, ProgressRequest, SummaryRequest};
use crate::dto::response::ApiResponse;
use crate::extractors::{AuthUser, SessionToken, ValidatedJson};
use crate::state::AppState;

/// GET /api/courses/{id}/access
pub async fn get_access(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<i32>,
) -> Result<Json<ApiResponse<Option<CourseAccessRequest>>>, AppError> {
    let row = state.services.courses.get(&auth, course_id).await?;
    Ok(Json(ApiResponse::ok(row)))
}

/// POST /api/courses/{id}/access
pub async fn request_access(
    State(state): State<AppState>,
    token: SessionToken,
    Path(course_id): Path<i32>,
) -> Result<Json<ApiResponse<CourseAccessRequest>>, AppError> {
    let ctx = state.guard.require_learner(token.as_deref()).await?;
    let row = state.services.courses.request(&ctx, course_id).await?;
    Ok(Json(ApiResponse::ok(row)))
}

/// PUT /api/courses/{id}/progress
pub async fn update_progress(
    State(state): State<AppState>,
    token: SessionToken,
    Path(course_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<ProgressRequest>,
) -> Result<Json<ApiResponse<CourseAccessRequest>>, AppError> {
    let ctx = state.guard.require_learner(token.as_deref()).await?;
    let row = state
        .services
        .courses
        .update_progress(&ctx, course_id, req.last_video_sec, req.progress)
        .await?;
    Ok(Json(ApiResponse::ok(row)))
}

/// POST /api/courses/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    token: SessionToken,
    Path(course_id): Path<i32>,
) -> Result<Json<ApiResponse<CourseAccessRequest>>, AppError> {
    let ctx = state.guard.require_learner(token.as_deref()).await?;
    let row = state.services.courses.complete(&ctx, course_id).await?;
    Ok(Json(ApiResponse::ok(row)))
}

/// PUT /api/courses/{id}/summary
pub async fn submit_summary(
    State(state): State<AppState>,
    token: SessionToken,
    Path(course_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<SummaryRequest>,
) -> Result<Json<ApiResponse<ProgressSummary>>, AppError> {
    let ctx = state.guard.require_learner(token.as_deref()).await?;
    let summary = state
        .services
        .courses
        .submit_summary(&ctx, course_id, &req.content)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// GET /api/review/courses
pub async fn list_pending(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<ApiResponse<Vec<CourseAccessRequest>>>, AppError> {
    let ctx = state.guard.require_manager(token.as_deref()).await?;
    let rows = state.services.courses.list_pending(&ctx).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// POST /api/review/courses
pub async fn review(
    State(state): State<AppState>,
    token: SessionToken,
    ValidatedJson(req): ValidatedJson<CourseReviewRequest>,
) -> Result<Json<ApiResponse<CourseAccessRequest>>, AppError> {
    let ctx = state.guard.require_manager(token.as_deref()).await?;
    let row = state
        .services
        .courses
        .review(&ctx, req.user_id, req.course_id, req.decision, req.reason)
        .await?;
    Ok(Json(ApiResponse::ok(row)))
}

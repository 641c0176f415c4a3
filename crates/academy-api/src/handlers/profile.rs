//! Profile administration handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use academy_core::error::AppError;
use academy_entity::profile::{CoachAssignment, Profile};
use academy_service::profile::CreateProfileInput;

use crate::dto::request::{
    AssignCoachRequest, CreateProfileRequest, ResetPasswordRequest, UpdateStatusRequest,
};
use crate::dto::response::{ApiResponse, FlagResponse, MessageResponse};
use crate::extractors::{AuthUser, SessionToken, ValidatedJson};
use crate::state::AppState;

/// POST /api/profiles
pub async fn create_profile(
    State(state): State<AppState>,
    token: SessionToken,
    ValidatedJson(req): ValidatedJson<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Profile>>), AppError> {
    let ctx = state.guard.require_manager(token.as_deref()).await?;
    let profile = state
        .services
        .profiles
        .create_profile(
            &ctx,
            CreateProfileInput {
                username: req.username,
                password: req.password,
                role: req.role,
                display_name: req.display_name,
                leader_id: req.leader_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}

/// GET /api/profiles/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Profile>>, AppError> {
    let profile = state.services.profiles.get_profile(&auth, id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /api/profiles/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    token: SessionToken,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Profile>>, AppError> {
    let ctx = state.guard.require_admin(token.as_deref()).await?;
    let profile = state.services.profiles.set_status(&ctx, id, req.status).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /api/profiles/{id}/password
pub async fn reset_password(
    State(state): State<AppState>,
    token: SessionToken,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    let ctx = state.guard.require_super_admin(token.as_deref()).await?;
    state
        .services
        .profiles
        .reset_password(&ctx, id, &req.password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Password reset".to_string(),
    })))
}

/// POST /api/profiles/{id}/coaches
pub async fn assign_coach(
    State(state): State<AppState>,
    token: SessionToken,
    Path(student_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AssignCoachRequest>,
) -> Result<Json<ApiResponse<CoachAssignment>>, AppError> {
    let ctx = state.guard.require_admin(token.as_deref()).await?;
    let assignment = state
        .services
        .profiles
        .assign_coach(&ctx, req.coach_id, student_id)
        .await?;
    Ok(Json(ApiResponse::ok(assignment)))
}

/// DELETE /api/profiles/{id}/coaches/{coach_id}
pub async fn unassign_coach(
    State(state): State<AppState>,
    token: SessionToken,
    Path((student_id, coach_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<FlagResponse>>, AppError> {
    let ctx = state.guard.require_admin(token.as_deref()).await?;
    let removed = state
        .services
        .profiles
        .unassign_coach(&ctx, coach_id, student_id)
        .await?;
    Ok(Json(ApiResponse::ok(FlagResponse { value: removed })))
}

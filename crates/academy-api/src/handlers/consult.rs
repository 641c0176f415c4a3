//! Consult messaging handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use academy_core::error::AppError;
use academy_entity::consult::{ConsultMessage, ConversationSummary};

use crate::dto::request::{LimitQuery, SendMessageRequest};
use crate::dto::response::{ApiResponse, FlagResponse, MessageResponse, UpdatedResponse};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/consult/conversations
pub async fn conversations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ConversationSummary>>>, AppError> {
    let rows = state.services.consult.unread_by_peer(&auth).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// GET /api/consult/peers/{peer_id}/allowed
pub async fn can_consult(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(peer_id): Path<Uuid>,
) -> Result<Json<ApiResponse<FlagResponse>>, AppError> {
    let value = state.services.consult.can_consult_with(&auth, peer_id).await?;
    Ok(Json(ApiResponse::ok(FlagResponse { value })))
}

/// GET /api/consult/peers/{peer_id}/messages
pub async fn thread(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(peer_id): Path<Uuid>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<ConsultMessage>>>, AppError> {
    let rows = state
        .services
        .consult
        .thread(&auth, peer_id, query.limit)
        .await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// POST /api/consult/peers/{peer_id}/messages
pub async fn send(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(peer_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ConsultMessage>>), AppError> {
    let message = state
        .services
        .consult
        .send(&auth, peer_id, &req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}

/// POST /api/consult/peers/{peer_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(peer_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UpdatedResponse>>, AppError> {
    let updated = state.services.consult.mark_thread_read(&auth, peer_id).await?;
    Ok(Json(ApiResponse::ok(UpdatedResponse { updated })))
}

/// POST /api/consult/peers/{peer_id}/unread
pub async fn mark_unread(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(peer_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UpdatedResponse>>, AppError> {
    let updated = state.services.consult.mark_unread(&auth, peer_id).await?;
    Ok(Json(ApiResponse::ok(UpdatedResponse { updated })))
}

/// DELETE /api/consult/messages/{id}
pub async fn recall(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.services.consult.recall(&auth, message_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Message recalled".to_string(),
    })))
}

//! Notification handlers.

use axum::Json;
use axum::extract::{Query, State};

use academy_core::error::AppError;
use academy_entity::notification::Notification;

use crate::dto::request::{LimitQuery, MarkReadRequest};
use crate::dto::response::{ApiResponse, CountResponse, UpdatedResponse};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, AppError> {
    let rows = state.services.notifications.list(&auth, query.limit).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    let count = state.services.notifications.count_unread(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// POST /api/notifications/read
///
/// Marks every row sharing the given grouping tuple; `updated` counts rows.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<MarkReadRequest>,
) -> Result<Json<ApiResponse<UpdatedResponse>>, AppError> {
    let updated = state
        .services
        .notifications
        .mark_read(&auth, &req.into())
        .await?;
    Ok(Json(ApiResponse::ok(UpdatedResponse { updated })))
}

/// POST /api/notifications/read-all
///
/// `updated` counts groups, not rows.
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UpdatedResponse>>, AppError> {
    let updated = state.services.notifications.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(UpdatedResponse { updated })))
}

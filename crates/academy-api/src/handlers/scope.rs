//! Scope handler.

use axum::Json;

use academy_auth::Scope;
use academy_core::error::AppError;

use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;

/// GET /api/scope
///
/// `data` is `null` for unrestricted callers, otherwise the visible user ids.
pub async fn my_scope(auth: AuthUser) -> Result<Json<ApiResponse<Scope>>, AppError> {
    Ok(Json(ApiResponse::ok(auth.scope().await?)))
}

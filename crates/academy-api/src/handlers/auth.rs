//! Auth handlers: login, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;

use academy_auth::SessionCookie;
use academy_core::error::AppError;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, LoginResponse, MeResponse, MessageResponse};
use crate::extractors::{AuthUser, SessionToken, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let sessions = state.guard.sessions();
    let (user, session) = sessions.login(&req.username, &req.password).await?;
    let role = state.guard.roles().normalize(&user.role);

    let body = ApiResponse::ok(LoginResponse {
        user,
        role,
        token: session.token,
        expires_at: session.expires_at,
    });
    Ok(([(SET_COOKIE, session.cookie.to_header_value())], Json(body)))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<impl IntoResponse, AppError> {
    let token = token
        .as_deref()
        .ok_or_else(|| AppError::unauthorized("Not signed in"))?;
    state.guard.sessions().logout(token).await?;

    let cleared = SessionCookie::cleared(state.guard.sessions().config());
    let body = ApiResponse::ok(MessageResponse {
        message: "Logged out".to_string(),
    });
    Ok(([(SET_COOKIE, cleared.to_header_value())], Json(body)))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<MeResponse>> {
    let AuthUser(ctx) = auth;
    Json(ApiResponse::ok(MeResponse {
        user: ctx.actor.profile,
        role: ctx.actor.role,
    }))
}

//! Session token extraction from the session cookie or a Bearer header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use academy_auth::GuardContext;
use academy_core::error::AppError;

use crate::state::AppState;

/// The raw session token, if the request carries one.
///
/// The configured cookie wins over `Authorization: Bearer`. Extraction never
/// fails; handlers hand the token to the guard tier they need.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl SessionToken {
    fn from_parts(parts: &Parts, state: &AppState) -> Self {
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(&state.config.session.cookie_name) {
            if !cookie.value().is_empty() {
                return Self(Some(cookie.value().to_string()));
            }
        }

        let bearer = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_string());
        Self(bearer)
    }
}

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, state))
    }
}

/// Any signed-in, active user with a recognized role.
#[derive(Debug, Clone)]
pub struct AuthUser(pub GuardContext);

impl std::ops::Deref for AuthUser {
    type Target = GuardContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = SessionToken::from_parts(parts, state);
        let ctx = state.guard.require_system_user(token.as_deref()).await?;
        Ok(Self(ctx))
    }
}

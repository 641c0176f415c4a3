//! JSON bodies validated with `validator`.

use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::extract::rejection::JsonRejection;
use serde::de::DeserializeOwned;
use validator::Validate;

use academy_core::error::AppError;

/// Like [`Json`], but rejects malformed or invalid bodies with `INVALID_BODY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::invalid_body(e.body_text()))?;
        value
            .validate()
            .map_err(|e| AppError::invalid_body(format!("Invalid request body: {e}")))?;
        Ok(Self(value))
    }
}

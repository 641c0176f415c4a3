//! Job lock entry points for external schedulers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use chrono::Duration;
use tracing::warn;

use academy_core::error::{AppError, ErrorKind};
use academy_entity::job::JobLock;

use crate::dto::request::{AcquireJobRequest, ReleaseJobRequest};
use crate::dto::response::{AcquireResponse, ApiResponse, MessageResponse};
use crate::extractors::ValidatedJson;
use crate::state::AppState;

const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// `FORBIDDEN` while no secret is configured, `UNAUTHORIZED` on a mismatch.
fn check_cron_secret(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let expected = state.config.worker.cron_secret.as_str();
    if expected.is_empty() {
        return Err(AppError::forbidden("Job endpoints are disabled"));
    }

    let presented = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented.as_bytes() != expected.as_bytes() {
        warn!("Rejected job lock call with a bad cron secret");
        return Err(AppError::unauthorized("Invalid cron secret"));
    }
    Ok(())
}

/// POST /api/jobs/{name}/acquire
///
/// A held lease is reported as `{ ok: false, error: "JOB_LOCKED" }`.
pub async fn acquire(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_name): Path<String>,
    ValidatedJson(req): ValidatedJson<AcquireJobRequest>,
) -> Result<Json<ApiResponse<AcquireResponse>>, AppError> {
    check_cron_secret(&state, &headers)?;

    let lease_seconds = req
        .lease_seconds
        .unwrap_or(state.config.worker.default_lease_seconds.min(86_400) as i64);
    let ok = state
        .job_lock
        .acquire(&job_name, Duration::seconds(lease_seconds))
        .await?;

    Ok(Json(ApiResponse::ok(AcquireResponse {
        ok,
        error: (!ok).then(|| ErrorKind::JobLocked.code().to_string()),
    })))
}

/// POST /api/jobs/{name}/release
pub async fn release(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_name): Path<String>,
    ValidatedJson(req): ValidatedJson<ReleaseJobRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    check_cron_secret(&state, &headers)?;
    state
        .job_lock
        .release(&job_name, req.error.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Released".to_string(),
    })))
}

/// GET /api/jobs/{name}
pub async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(job_name): Path<String>,
) -> Result<Json<ApiResponse<JobLock>>, AppError> {
    check_cron_secret(&state, &headers)?;
    let record = state
        .job_lock
        .status(&job_name)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No lock named '{job_name}'")))?;
    Ok(Json(ApiResponse::ok(record)))
}

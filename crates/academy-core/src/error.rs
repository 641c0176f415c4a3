//! Unified application error types.
//!
//! Every crate maps its failures into [`AppError`] so that guards, workflows
//! and the HTTP layer share one taxonomy with stable string codes.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error categories. Each one has a stable machine-readable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No session, an invalid session, or a superseded session.
    Unauthorized,
    /// A session token failed signature or expiration checks.
    InvalidToken,
    /// Authenticated, but the account is frozen.
    Frozen,
    /// Authenticated, but role or scope is insufficient.
    Forbidden,
    /// The referenced entity does not exist.
    NotFound,
    /// Malformed request body.
    InvalidBody,
    /// Course id outside the configured range.
    InvalidCourse,
    /// Unknown learning track.
    InvalidTrack,
    /// The caller has no workflow row for the resource.
    NoAccess,
    /// The workflow row exists but is not approved.
    NotApproved,
    /// The previous course summary has not been submitted.
    PrevSummaryRequired,
    /// A job lease is held elsewhere.
    JobLocked,
    /// The recall window of a message has passed.
    RecallExpired,
    /// Password policy violation.
    WeakPassword,
    /// Opaque backing-store failure.
    Database,
    /// Invalid or inconsistent configuration.
    Configuration,
    /// Unexpected internal failure.
    Internal,
}

impl ErrorKind {
    /// Stable code sent to callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Frozen => "FROZEN",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidBody => "INVALID_BODY",
            Self::InvalidCourse => "INVALID_COURSE",
            Self::InvalidTrack => "INVALID_TRACK",
            Self::NoAccess => "NO_ACCESS",
            Self::NotApproved => "NOT_APPROVED",
            Self::PrevSummaryRequired => "PREV_SUMMARY_REQUIRED",
            Self::JobLocked => "JOB_LOCKED",
            Self::RecallExpired => "RECALL_EXPIRED",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::Database => "DB_ERROR",
            Self::Configuration => "CONFIGURATION",
            Self::Internal => "INTERNAL",
        }
    }

    /// HTTP status used when the error crosses the API boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Frozen | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidBody | Self::InvalidCourse | Self::InvalidTrack | Self::WeakPassword => {
                StatusCode::BAD_REQUEST
            }
            Self::NoAccess
            | Self::NotApproved
            | Self::PrevSummaryRequired
            | Self::RecallExpired => StatusCode::CONFLICT,
            Self::JobLocked => StatusCode::LOCKED,
            Self::Database | Self::Configuration | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the message may be shown to the caller verbatim.
    fn is_opaque(&self) -> bool {
        matches!(self, Self::Database | Self::Internal | Self::Configuration)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Stable code of this error.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken, message)
    }

    pub fn frozen(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Frozen, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidBody, message)
    }

    pub fn invalid_course(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCourse, message)
    }

    pub fn no_access(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoAccess, message)
    }

    pub fn not_approved(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotApproved, message)
    }

    pub fn prev_summary_required(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PrevSummaryRequired, message)
    }

    pub fn job_locked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::JobLocked, message)
    }

    pub fn recall_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RecallExpired, message)
    }

    pub fn weak_password(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::WeakPassword, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns `true` if the error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::InvalidBody,
            format!("JSON error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        let message = if self.kind.is_opaque() {
            tracing::error!(code = %self.kind, error = %self.message, "Request failed");
            "The request could not be completed".to_string()
        } else {
            self.message
        };

        let body = ApiErrorResponse {
            error: self.kind.code().to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

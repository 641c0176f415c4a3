//! # academy-api
//!
//! HTTP API layer for the Academy back office built on Axum.
//!
//! Provides the REST endpoints, the session-token extractor, validated JSON
//! bodies, CORS, and request tracing. Errors render through
//! [`AppError`](academy_core::AppError)'s `IntoResponse`.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;

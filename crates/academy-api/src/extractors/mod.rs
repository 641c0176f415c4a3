//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::{AuthUser, SessionToken};
pub use json::ValidatedJson;

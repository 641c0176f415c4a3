//! HTTP request handlers, one module per domain.

pub mod auth;
pub mod consult;
pub mod course;
pub mod file_access;
pub mod health;
pub mod jobs;
pub mod ladder;
pub mod notification;
pub mod profile;
pub mod scope;

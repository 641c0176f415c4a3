//! Notification fan-out and grouped read semantics.

pub mod service;

pub use service::NotificationService;

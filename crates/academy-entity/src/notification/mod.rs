//! Notification entities.

pub mod model;

pub use model::{Notification, NotificationKey};

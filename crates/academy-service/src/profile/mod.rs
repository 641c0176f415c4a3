//! Profile administration.

pub mod service;

pub use service::{CreateProfileInput, ProfileService};

//! # academy-core
//!
//! Core crate for the Academy back office. Contains configuration schemas,
//! the clock abstraction, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Academy crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use traits::clock::{Clock, ManualClock, SystemClock};

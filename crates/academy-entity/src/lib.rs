//! # academy-entity
//!
//! Typed domain records. Repositories return these structs; nothing above
//! the database crate handles untyped rows.

pub mod consult;
pub mod job;
pub mod notification;
pub mod profile;
pub mod workflow;

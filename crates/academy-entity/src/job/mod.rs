//! Named job leases.

pub mod model;

pub use model::JobLock;

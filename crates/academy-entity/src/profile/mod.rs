//! Profile (account) entities.

pub mod assignment;
pub mod model;
pub mod role;
pub mod status;

pub use assignment::CoachAssignment;
pub use model::{NewProfile, Profile};
pub use role::CanonicalRole;
pub use status::ProfileStatus;

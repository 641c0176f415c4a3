//! Request / review workflow records.

pub mod course;
pub mod file_access;
pub mod ladder;
pub mod status;

pub use course::{CourseAccessRequest, ProgressSummary};
pub use file_access::{FileAccessRequest, FilePermission};
pub use ladder::LadderAuthorization;
pub use status::{RequestStatus, ReviewDecision};

//! Distributed job lock and scheduled maintenance for the Academy back office.
//!
//! This crate provides:
//! - [`JobLock`], a named lease shared by every server instance
//! - A job executor that runs registered handlers under that lease
//! - A cron scheduler that triggers the executor
//! - Built-in jobs for session sweeping and notification cleanup

pub mod executor;
pub mod jobs;
pub mod lock;
pub mod scheduler;

pub use executor::{JobExecutor, JobHandler};
pub use lock::JobLock;
pub use scheduler::CronScheduler;

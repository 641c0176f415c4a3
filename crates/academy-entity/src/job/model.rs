//! Job lock entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named mutex lease. At most one holder per `job_name` at any instant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobLock {
    /// Unique job name, e.g. `cron_news_ingest`.
    pub job_name: String,
    /// Lease end; `None` or past means unlocked.
    pub locked_until: Option<DateTime<Utc>>,
    /// Error recorded by the last release.
    pub last_error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl JobLock {
    /// Whether a lease is held at `now`.
    pub fn is_held(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}

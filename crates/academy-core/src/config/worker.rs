//! Scheduled job configuration.

use serde::{Deserialize, Serialize};

/// Scheduler and job-lock settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the in-process scheduler runs.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Shared secret expected in `x-cron-secret` by the job-lock endpoints.
    /// The endpoints are disabled while this is empty.
    #[serde(default)]
    pub cron_secret: String,
    /// Lease applied by scheduled jobs.
    #[serde(default = "default_lease")]
    pub default_lease_seconds: u64,
    /// Read notifications older than this are deleted.
    #[serde(default = "default_retention")]
    pub notification_retention_days: i64,
    /// Cron expression (with seconds) for the expired-session sweep.
    #[serde(default = "default_session_sweep_cron")]
    pub session_sweep_cron: String,
    /// Cron expression (with seconds) for the notification cleanup.
    #[serde(default = "default_notification_cleanup_cron")]
    pub notification_cleanup_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cron_secret: String::new(),
            default_lease_seconds: default_lease(),
            notification_retention_days: default_retention(),
            session_sweep_cron: default_session_sweep_cron(),
            notification_cleanup_cron: default_notification_cleanup_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_lease() -> u64 {
    300
}

fn default_retention() -> i64 {
    90
}

fn default_session_sweep_cron() -> String {
    "0 */15 * * * *".to_string()
}

fn default_notification_cleanup_cron() -> String {
    "0 30 3 * * *".to_string()
}

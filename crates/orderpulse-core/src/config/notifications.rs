//! Notification store and retention configuration.

use serde::{Deserialize, Serialize};

/// Notification persistence and retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Days after `read_at` before a read notification becomes eligible for cleanup.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Rows deleted per retention statement.
    #[serde(default = "default_batch_size")]
    pub retention_batch_size: u32,
    /// Cron expression (with seconds) for the scheduled retention job.
    #[serde(default = "default_cleanup_cron")]
    pub cleanup_cron: String,
    /// Whether the scheduled retention job is registered at all.
    #[serde(default = "default_true")]
    pub cleanup_enabled: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            retention_batch_size: default_batch_size(),
            cleanup_cron: default_cleanup_cron(),
            cleanup_enabled: true,
        }
    }
}

impl NotificationsConfig {
    /// Retention threshold as a duration.
    pub fn retention_max_age(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.retention_days))
    }
}

fn default_retention_days() -> u32 {
    30
}

fn default_batch_size() -> u32 {
    1000
}

fn default_cleanup_cron() -> String {
    "0 0 2 * * *".to_string()
}

fn default_true() -> bool {
    true
}

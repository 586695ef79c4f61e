//! Response DTOs.

use serde::Serialize;

use orderpulse_realtime::MetricsSnapshot;

/// Unread counter.
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    /// Unread notifications.
    pub count: u64,
}

/// Result of a bulk mark-read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedResponse {
    /// Notifications that changed from unread to read.
    pub modified_count: u64,
}

/// Result of a bulk delete.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    /// Notifications removed.
    pub deleted_count: u64,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "ok" while the realtime engine runs.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the state was built.
    pub uptime_seconds: u64,
}

/// Readiness response with subsystem detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Store backend and its reachability.
    pub storage: String,
    /// Whether the realtime engine accepts work.
    pub realtime_running: bool,
    /// Live sessions.
    pub sessions: usize,
    /// Distinct connected users.
    pub online_users: usize,
    /// Topics with at least one member.
    pub topics: usize,
    /// Sessions joined to the staff broadcast topic.
    pub staff_sessions: usize,
    /// Engine counters.
    pub metrics: MetricsSnapshot,
}

//! Request DTOs.

use serde::Deserialize;

/// Body of `PATCH /api/notifications/mark-many-read`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkManyReadRequest {
    /// Raw notification ids; malformed ids are rejected.
    pub notification_ids: Vec<String>,
}

/// Query of `DELETE /api/notifications/cleanup`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupQuery {
    /// Read-age threshold in days; the configured retention when absent.
    pub days_old: Option<i64>,
}

/// Query of `GET /ws`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WsQuery {
    /// Bearer credential.
    pub token: Option<String>,
}

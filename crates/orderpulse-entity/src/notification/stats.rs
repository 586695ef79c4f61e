//! Aggregate notification statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::category::NotificationCategory;

/// Store-wide notification counts, computed with aggregate queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStats {
    /// All notifications.
    pub total: u64,
    /// Unread notifications.
    pub unread: u64,
    /// Read notifications.
    pub read: u64,
    /// Counts per category. Categories with no records are omitted.
    pub by_category: BTreeMap<NotificationCategory, u64>,
    /// Notifications created in the last 24 hours.
    #[serde(rename = "last24Hours")]
    pub last_24_hours: u64,
}

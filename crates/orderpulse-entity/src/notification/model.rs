//! Notification entity model.

use chrono::{DateTime, Duration, Utc};
use orderpulse_core::types::{NotificationId, UserId};
use serde::Serialize;

use super::category::NotificationCategory;
use super::context::NotificationContext;

/// A notification recorded for a single recipient.
///
/// `read` and `read_at` are only reachable through [`Notification::mark_read`],
/// so `read_at` is set exactly when `read` is true.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The owning user. Never changes after creation.
    pub recipient_id: UserId,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Category and its structured context.
    #[serde(flatten)]
    pub context: NotificationContext,
    read: bool,
    read_at: Option<DateTime<Utc>>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a new unread notification.
    pub fn new(
        recipient_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        context: NotificationContext,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            recipient_id,
            title: title.into(),
            body: body.into(),
            context,
            read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a stored notification. The read flag follows `read_at`.
    pub fn restore(
        id: NotificationId,
        recipient_id: UserId,
        title: String,
        body: String,
        context: NotificationContext,
        read_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            recipient_id,
            title,
            body,
            context,
            read: read_at.is_some(),
            read_at,
            created_at,
        }
    }

    /// The category derived from the context.
    pub fn category(&self) -> NotificationCategory {
        self.context.category()
    }

    /// Whether the recipient has read this notification.
    pub fn is_read(&self) -> bool {
        self.read
    }

    /// When the notification was first marked read.
    pub fn read_at(&self) -> Option<DateTime<Utc>> {
        self.read_at
    }

    /// Mark the notification read at `at`.
    ///
    /// Returns `true` only on the unread → read transition; a second call
    /// leaves `read_at` untouched.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.read {
            return false;
        }
        self.read = true;
        self.read_at = Some(at);
        true
    }

    /// Whether the notification was created within the last 24 hours.
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at <= Duration::hours(24)
    }

    /// Whether a retention sweep with the given cutoff may delete this record.
    pub fn is_expired_read(&self, cutoff: DateTime<Utc>) -> bool {
        matches!(self.read_at, Some(at) if self.read && at < cutoff)
    }
}

//! Repository traits and their PostgreSQL implementations.

pub mod notification;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use orderpulse_core::result::AppResult;
use orderpulse_core::types::{NotificationId, PageRequest, UserId};
use orderpulse_entity::notification::{Notification, NotificationStats};
use orderpulse_entity::user::User;

pub use notification::PgNotificationRepository;
pub use user::PgUserDirectory;

/// Durable storage of notifications, partitioned by recipient.
///
/// Every mutating operation takes the recipient id and only touches records
/// it owns. A record owned by someone else is indistinguishable from a
/// missing one.
#[async_trait]
pub trait NotificationRepository: Send + Sync + 'static {
    /// Persist a new notification.
    async fn insert(&self, notification: &Notification) -> AppResult<()>;

    /// One page of a recipient's notifications, newest first, plus the total
    /// matching count.
    async fn find_by_recipient(
        &self,
        recipient_id: UserId,
        page: PageRequest,
        unread_only: bool,
    ) -> AppResult<(Vec<Notification>, u64)>;

    /// Number of unread notifications for a recipient.
    async fn count_unread(&self, recipient_id: UserId) -> AppResult<u64>;

    /// Mark one owned notification read. `read_at` keeps its first value.
    /// Returns `None` when the record does not exist for this recipient.
    async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Notification>>;

    /// Mark the owned, unread subset of `ids` read. Returns how many changed.
    async fn mark_many_read(
        &self,
        recipient_id: UserId,
        ids: &[NotificationId],
        at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Mark every unread notification of a recipient read.
    async fn mark_all_read(&self, recipient_id: UserId, at: DateTime<Utc>) -> AppResult<u64>;

    /// Delete one owned notification. Returns `false` when nothing matched.
    async fn delete(&self, id: NotificationId, recipient_id: UserId) -> AppResult<bool>;

    /// Delete every read notification of a recipient.
    async fn delete_all_read(&self, recipient_id: UserId) -> AppResult<u64>;

    /// Delete at most `limit` read notifications whose `read_at` is before
    /// `cutoff`. Unread notifications are never touched.
    async fn delete_read_before(&self, cutoff: DateTime<Utc>, limit: u64) -> AppResult<u64>;

    /// Store-wide aggregate counts.
    async fn stats(&self, now: DateTime<Utc>) -> AppResult<NotificationStats>;
}

/// Read access to user accounts, used for role resolution and staff fan-out.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Every user whose role receives staff broadcasts.
    async fn find_staff(&self) -> AppResult<Vec<User>>;
}

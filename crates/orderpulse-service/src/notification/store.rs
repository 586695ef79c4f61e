//! Notification store: durable per-recipient records with read state and
//! retention.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument};

use orderpulse_core::config::NotificationsConfig;
use orderpulse_core::error::AppError;
use orderpulse_core::result::AppResult;
use orderpulse_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use orderpulse_database::repositories::NotificationRepository;
use orderpulse_entity::notification::{Notification, NotificationContext, NotificationStats};

/// Upper bound on ids accepted by a single bulk mark-read.
pub const MAX_BULK_IDS: usize = 500;

/// Owns the notification record lifecycle.
///
/// Storage failures are surfaced to the caller unchanged; nothing here
/// retries.
#[derive(Clone)]
pub struct NotificationStore {
    repo: Arc<dyn NotificationRepository>,
    retention_batch_size: u64,
}

impl std::fmt::Debug for NotificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationStore")
            .field("retention_batch_size", &self.retention_batch_size)
            .finish_non_exhaustive()
    }
}

impl NotificationStore {
    /// Creates a store over the given repository.
    pub fn new(repo: Arc<dyn NotificationRepository>, config: &NotificationsConfig) -> Self {
        Self {
            repo,
            retention_batch_size: u64::from(config.retention_batch_size.max(1)),
        }
    }

    /// Records a new unread notification. The category follows `context`.
    #[instrument(skip(self, title, body, context), fields(category = %context.category()))]
    pub async fn create(
        &self,
        recipient_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        context: NotificationContext,
    ) -> AppResult<Notification> {
        let notification = Notification::new(recipient_id, title, body, context);
        self.repo.insert(&notification).await?;
        debug!(
            notification_id = %notification.id,
            recipient_id = %recipient_id,
            "Notification recorded"
        );
        Ok(notification)
    }

    /// Lists a recipient's notifications, newest first.
    ///
    /// `page` and `page_size` must be at least 1; oversized pages are
    /// clamped.
    pub async fn list_for_user(
        &self,
        recipient_id: UserId,
        page: i64,
        page_size: i64,
        unread_only: bool,
    ) -> AppResult<PageResponse<Notification>> {
        let request = PageRequest::try_new(page, page_size)?;
        let (items, total) = self
            .repo
            .find_by_recipient(recipient_id, request, unread_only)
            .await?;
        Ok(PageResponse::new(items, request, total))
    }

    /// Number of unread notifications for a recipient.
    pub async fn unread_count(&self, recipient_id: UserId) -> AppResult<u64> {
        self.repo.count_unread(recipient_id).await
    }

    /// Marks one notification read. A record owned by someone else is
    /// reported as `NotFound`. Calling twice is harmless.
    pub async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
    ) -> AppResult<Notification> {
        self.repo
            .mark_read(id, recipient_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    /// Marks the owned, unread subset of `ids` read.
    pub async fn mark_many_read(
        &self,
        recipient_id: UserId,
        ids: &[NotificationId],
    ) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::invalid_argument("Notification IDs array is required"));
        }
        if ids.len() > MAX_BULK_IDS {
            return Err(AppError::invalid_argument(format!(
                "At most {MAX_BULK_IDS} notification IDs may be marked at once, got {}",
                ids.len()
            )));
        }
        self.repo.mark_many_read(recipient_id, ids, Utc::now()).await
    }

    /// Marks every unread notification of a recipient read.
    pub async fn mark_all_read(&self, recipient_id: UserId) -> AppResult<u64> {
        self.repo.mark_all_read(recipient_id, Utc::now()).await
    }

    /// Deletes one owned notification.
    pub async fn delete(&self, id: NotificationId, recipient_id: UserId) -> AppResult<()> {
        if self.repo.delete(id, recipient_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Notification not found"))
        }
    }

    /// Deletes every read notification of a recipient.
    pub async fn delete_all_read(&self, recipient_id: UserId) -> AppResult<u64> {
        self.repo.delete_all_read(recipient_id).await
    }

    /// Deletes read notifications whose `read_at` is older than `max_age`.
    ///
    /// Runs in batches until a batch comes back short. Unread notifications
    /// are never deleted.
    #[instrument(skip(self))]
    pub async fn retention_cleanup(&self, max_age: Duration) -> AppResult<u64> {
        if max_age < Duration::zero() {
            return Err(AppError::invalid_argument("Retention age must not be negative"));
        }
        let cutoff = Utc::now().checked_sub_signed(max_age).ok_or_else(|| {
            AppError::invalid_argument("Retention age reaches past the earliest representable time")
        })?;
        let mut deleted = 0u64;
        loop {
            let batch = self
                .repo
                .delete_read_before(cutoff, self.retention_batch_size)
                .await?;
            deleted += batch;
            if batch < self.retention_batch_size {
                break;
            }
            tokio::task::yield_now().await;
        }
        info!(deleted, cutoff = %cutoff, "Retention cleanup finished");
        Ok(deleted)
    }

    /// Store-wide aggregate counts.
    pub async fn stats_snapshot(&self) -> AppResult<NotificationStats> {
        self.repo.stats(Utc::now()).await
    }
}

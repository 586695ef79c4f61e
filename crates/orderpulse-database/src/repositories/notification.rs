//! PostgreSQL notification repository.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use orderpulse_core::error::AppError;
use orderpulse_core::result::AppResult;
use orderpulse_core::types::{NotificationId, PageRequest, UserId};
use orderpulse_entity::notification::{
    Notification, NotificationCategory, NotificationContext, NotificationStats,
};

use super::NotificationRepository;
use crate::error::map_sqlx;

const COLUMNS: &str = "id, recipient_id, category, title, body, context, read, read_at, created_at";

/// Row shape of the `notifications` table.
#[derive(Debug, FromRow)]
struct NotificationRow {
    id: NotificationId,
    recipient_id: UserId,
    category: String,
    title: String,
    body: String,
    context: serde_json::Value,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = AppError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let category: NotificationCategory = row.category.parse()?;
        let context = NotificationContext::from_parts(category, row.context).map_err(|e| {
            AppError::with_source(
                orderpulse_core::ErrorKind::Serialization,
                format!("Corrupt context on notification {}", row.id),
                e,
            )
        })?;
        Ok(Notification::restore(
            row.id,
            row.recipient_id,
            row.title,
            row.body,
            context,
            row.read_at,
            row.created_at,
        ))
    }
}

fn into_notifications(rows: Vec<NotificationRow>) -> AppResult<Vec<Notification>> {
    rows.into_iter().map(Notification::try_from).collect()
}

/// Notification repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert(&self, notification: &Notification) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notifications (id, recipient_id, category, title, body, context, read, read_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(notification.id)
        .bind(notification.recipient_id)
        .bind(notification.category().as_str())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.context.body_json())
        .bind(notification.is_read())
        .bind(notification.read_at())
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to create notification", e))?;
        Ok(())
    }

    async fn find_by_recipient(
        &self,
        recipient_id: UserId,
        page: PageRequest,
        unread_only: bool,
    ) -> AppResult<(Vec<Notification>, u64)> {
        let filter = if unread_only {
            "recipient_id = $1 AND read = FALSE"
        } else {
            "recipient_id = $1"
        };

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM notifications WHERE {filter}"
        ))
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to count notifications", e))?;

        let offset = i64::try_from(page.offset())
            .map_err(|_| AppError::invalid_argument("Page offset out of range"))?;
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE {filter} \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(recipient_id)
        .bind(page.limit() as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to list notifications", e))?;

        Ok((into_notifications(rows)?, total as u64))
    }

    async fn count_unread(&self, recipient_id: UserId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to count unread", e))?;
        Ok(count as u64)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "UPDATE notifications SET read = TRUE, read_at = COALESCE(read_at, $3) \
             WHERE id = $1 AND recipient_id = $2 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(recipient_id)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to mark notification read", e))?;

        row.map(Notification::try_from).transpose()
    }

    async fn mark_many_read(
        &self,
        recipient_id: UserId,
        ids: &[NotificationId],
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE, read_at = $3 \
             WHERE recipient_id = $1 AND id = ANY($2) AND read = FALSE",
        )
        .bind(recipient_id)
        .bind(&ids)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to mark notifications read", e))?;
        Ok(result.rows_affected())
    }

    async fn mark_all_read(&self, recipient_id: UserId, at: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE, read_at = $2 \
             WHERE recipient_id = $1 AND read = FALSE",
        )
        .bind(recipient_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: NotificationId, recipient_id: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
            .bind(id)
            .bind(recipient_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx("Failed to delete notification", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_read(&self, recipient_id: UserId) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE recipient_id = $1 AND read = TRUE")
                .bind(recipient_id)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx("Failed to delete read notifications", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_read_before(&self, cutoff: DateTime<Utc>, limit: u64) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id IN (\
                SELECT id FROM notifications WHERE read AND read_at < $1 LIMIT $2\
             )",
        )
        .bind(cutoff)
        .bind(limit as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to cleanup notifications", e))?;
        Ok(result.rows_affected())
    }

    async fn stats(&self, now: DateTime<Utc>) -> AppResult<NotificationStats> {
        let (total, unread, recent): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE read = FALSE), \
                    COUNT(*) FILTER (WHERE created_at >= $1) \
             FROM notifications",
        )
        .bind(now - Duration::hours(24))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to aggregate notification stats", e))?;

        let per_category: Vec<(String, i64)> =
            sqlx::query_as("SELECT category, COUNT(*) FROM notifications GROUP BY category")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx("Failed to aggregate notification categories", e))?;

        let mut stats = NotificationStats {
            total: total as u64,
            unread: unread as u64,
            read: (total - unread) as u64,
            last_24_hours: recent as u64,
            ..Default::default()
        };
        for (category, count) in per_category {
            match category.parse::<NotificationCategory>() {
                Ok(category) => {
                    stats.by_category.insert(category, count as u64);
                }
                Err(_) => tracing::warn!(category = %category, "Unknown category in notification stats"),
            }
        }
        Ok(stats)
    }
}

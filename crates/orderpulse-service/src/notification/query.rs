//! Read-side delivery API for offline and reconnecting clients.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;

use orderpulse_core::error::AppError;
use orderpulse_core::result::AppResult;
use orderpulse_core::types::pagination::DEFAULT_PAGE_SIZE;
use orderpulse_core::types::{NotificationId, PageResponse};
use orderpulse_entity::notification::{Notification, NotificationStats};

use super::store::NotificationStore;
use crate::context::RequestContext;

/// Listing parameters as received from a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Page number, 1-based. Defaults to 1.
    pub page: Option<i64>,
    /// Page size. Defaults to 20.
    pub limit: Option<i64>,
    /// Only unread notifications.
    #[serde(default)]
    pub unread_only: bool,
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page.
    pub page: u64,
    /// Page size actually applied.
    pub limit: u64,
    /// Total matching notifications.
    pub total: u64,
    /// Total pages.
    pub pages: u64,
}

/// One page of the caller's notifications plus their unread count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListing {
    /// Notifications on this page, newest first.
    pub notifications: Vec<Notification>,
    /// Unread notifications across all pages.
    pub unread_count: u64,
    /// Paging details.
    pub pagination: Pagination,
}

impl NotificationListing {
    fn new(page: PageResponse<Notification>, unread_count: u64) -> Self {
        Self {
            pagination: Pagination {
                page: page.page,
                limit: page.page_size,
                total: page.total_items,
                pages: page.total_pages,
            },
            notifications: page.items,
            unread_count,
        }
    }
}

/// Caller-scoped access to the notification store.
///
/// Identifiers arrive as raw strings; anything that is not a valid id is
/// rejected with `InvalidArgument` before touching storage.
#[derive(Debug, Clone)]
pub struct DeliveryQueryApi {
    store: Arc<NotificationStore>,
    default_retention_days: u32,
}

impl DeliveryQueryApi {
    /// Creates the query API.
    pub fn new(store: Arc<NotificationStore>, default_retention_days: u32) -> Self {
        Self {
            store,
            default_retention_days,
        }
    }

    /// Lists the caller's notifications.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> AppResult<NotificationListing> {
        let page = self
            .store
            .list_for_user(
                ctx.user_id,
                query.page.unwrap_or(1),
                query.limit.unwrap_or(DEFAULT_PAGE_SIZE as i64),
                query.unread_only,
            )
            .await?;
        let unread = self.store.unread_count(ctx.user_id).await?;
        Ok(NotificationListing::new(page, unread))
    }

    /// The caller's unread count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.store.unread_count(ctx.user_id).await
    }

    /// Marks one of the caller's notifications read.
    pub async fn mark_read(&self, ctx: &RequestContext, raw_id: &str) -> AppResult<Notification> {
        let id = parse_id(raw_id)?;
        self.store.mark_read(id, ctx.user_id).await
    }

    /// Marks several of the caller's notifications read.
    pub async fn mark_many_read(&self, ctx: &RequestContext, raw_ids: &[String]) -> AppResult<u64> {
        let ids = raw_ids
            .iter()
            .map(|raw| parse_id(raw))
            .collect::<AppResult<Vec<_>>>()?;
        self.store.mark_many_read(ctx.user_id, &ids).await
    }

    /// Marks all of the caller's notifications read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.store.mark_all_read(ctx.user_id).await
    }

    /// Deletes one of the caller's notifications.
    pub async fn delete(&self, ctx: &RequestContext, raw_id: &str) -> AppResult<()> {
        let id = parse_id(raw_id)?;
        self.store.delete(id, ctx.user_id).await
    }

    /// Deletes all of the caller's read notifications.
    pub async fn delete_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.store.delete_all_read(ctx.user_id).await
    }

    /// Store-wide statistics. Staff only.
    pub async fn stats(&self, ctx: &RequestContext) -> AppResult<NotificationStats> {
        ctx.require_staff()?;
        self.store.stats_snapshot().await
    }

    /// Runs retention cleanup now. Admin only.
    pub async fn cleanup(&self, ctx: &RequestContext, days_old: Option<i64>) -> AppResult<u64> {
        ctx.require_admin()?;
        let days = days_old.unwrap_or(i64::from(self.default_retention_days));
        if days < 0 {
            return Err(AppError::invalid_argument(format!(
                "daysOld must not be negative, got {days}"
            )));
        }
        let max_age = Duration::try_days(days)
            .ok_or_else(|| AppError::invalid_argument(format!("daysOld is out of range, got {days}")))?;
        let deleted = self.store.retention_cleanup(max_age).await?;
        info!(user_id = %ctx.user_id, days, deleted, "Manual notification cleanup");
        Ok(deleted)
    }
}

fn parse_id(raw: &str) -> AppResult<NotificationId> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::invalid_argument(format!("Invalid notification ID: '{raw}'")))
}

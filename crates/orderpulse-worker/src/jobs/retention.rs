//! Notification retention job.

use std::sync::Arc;

use chrono::Duration;

use orderpulse_core::result::AppResult;
use orderpulse_service::NotificationStore;

/// Deletes read notifications whose `read_at` is older than the retention
/// window. Unread notifications are never touched.
#[derive(Debug)]
pub struct RetentionJob {
    store: Arc<NotificationStore>,
    max_age: Duration,
}

impl RetentionJob {
    /// Create a new retention job
    pub fn new(store: Arc<NotificationStore>, max_age: Duration) -> Self {
        Self { store, max_age }
    }

    /// Run one cleanup pass
    pub async fn run(&self) -> AppResult<u64> {
        tracing::info!(max_age_days = self.max_age.num_days(), "Running notification retention");

        let deleted = self.store.retention_cleanup(self.max_age).await?;

        tracing::info!(deleted, "Notification retention complete");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderpulse_core::config::NotificationsConfig;
    use orderpulse_core::types::{OrderId, UserId};
    use orderpulse_database::MemoryNotificationRepository;
    use orderpulse_entity::notification::NotificationContext;

    fn context() -> NotificationContext {
        NotificationContext::OrderStatusChanged {
            order_id: OrderId::new(),
            old_status: "pending".into(),
            new_status: "confirmed".into(),
        }
    }

    #[tokio::test]
    async fn test_retention_keeps_unread() {
        let store = Arc::new(NotificationStore::new(
            Arc::new(MemoryNotificationRepository::new()),
            &NotificationsConfig::default(),
        ));
        let user = UserId::new();
        let read = store.create(user, "Read", "one", context()).await.unwrap();
        store.create(user, "Unread", "two", context()).await.unwrap();
        store.mark_read(read.id, user).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let job = RetentionJob::new(Arc::clone(&store), Duration::zero());
        assert_eq!(job.run().await.unwrap(), 1);
        assert_eq!(store.unread_count(user).await.unwrap(), 1);
        assert_eq!(job.run().await.unwrap(), 0);
    }
}

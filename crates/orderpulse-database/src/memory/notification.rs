//! In-memory notification repository.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;

use orderpulse_core::result::AppResult;
use orderpulse_core::types::{NotificationId, PageRequest, UserId};
use orderpulse_entity::notification::{Notification, NotificationStats};

use crate::repositories::NotificationRepository;

type Shard = Arc<RwLock<Vec<Notification>>>;

/// Notification repository keeping one lock per recipient.
///
/// Operations on different recipients never contend; operations on the same
/// recipient are serialized by that recipient's lock.
#[derive(Debug, Default)]
pub struct MemoryNotificationRepository {
    shards: DashMap<UserId, Shard>,
}

impl MemoryNotificationRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn shard(&self, recipient_id: UserId) -> Option<Shard> {
        self.shards.get(&recipient_id).map(|s| Arc::clone(s.value()))
    }

    fn shard_or_create(&self, recipient_id: UserId) -> Shard {
        Arc::clone(self.shards.entry(recipient_id).or_default().value())
    }

    fn all_shards(&self) -> Vec<Shard> {
        self.shards.iter().map(|s| Arc::clone(s.value())).collect()
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotificationRepository {
    async fn insert(&self, notification: &Notification) -> AppResult<()> {
        let shard = self.shard_or_create(notification.recipient_id);
        shard.write().await.push(notification.clone());
        Ok(())
    }

    async fn find_by_recipient(
        &self,
        recipient_id: UserId,
        page: PageRequest,
        unread_only: bool,
    ) -> AppResult<(Vec<Notification>, u64)> {
        let Some(shard) = self.shard(recipient_id) else {
            return Ok((Vec::new(), 0));
        };
        let guard = shard.read().await;

        let mut matching: Vec<&Notification> = guard
            .iter()
            .rev()
            .filter(|n| !unread_only || !n.is_read())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn count_unread(&self, recipient_id: UserId) -> AppResult<u64> {
        let Some(shard) = self.shard(recipient_id) else {
            return Ok(0);
        };
        let guard = shard.read().await;
        Ok(guard.iter().filter(|n| !n.is_read()).count() as u64)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Notification>> {
        let Some(shard) = self.shard(recipient_id) else {
            return Ok(None);
        };
        let mut guard = shard.write().await;
        Ok(guard.iter_mut().find(|n| n.id == id).map(|n| {
            n.mark_read(at);
            n.clone()
        }))
    }

    async fn mark_many_read(
        &self,
        recipient_id: UserId,
        ids: &[NotificationId],
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let Some(shard) = self.shard(recipient_id) else {
            return Ok(0);
        };
        let wanted: HashSet<NotificationId> = ids.iter().copied().collect();
        let mut guard = shard.write().await;
        let modified = guard
            .iter_mut()
            .filter(|n| wanted.contains(&n.id))
            .filter_map(|n| n.mark_read(at).then_some(()))
            .count();
        Ok(modified as u64)
    }

    async fn mark_all_read(&self, recipient_id: UserId, at: DateTime<Utc>) -> AppResult<u64> {
        let Some(shard) = self.shard(recipient_id) else {
            return Ok(0);
        };
        let mut guard = shard.write().await;
        let modified = guard
            .iter_mut()
            .map(|n| n.mark_read(at))
            .filter(|changed| *changed)
            .count();
        Ok(modified as u64)
    }

    async fn delete(&self, id: NotificationId, recipient_id: UserId) -> AppResult<bool> {
        let Some(shard) = self.shard(recipient_id) else {
            return Ok(false);
        };
        let mut guard = shard.write().await;
        let before = guard.len();
        guard.retain(|n| n.id != id);
        Ok(guard.len() < before)
    }

    async fn delete_all_read(&self, recipient_id: UserId) -> AppResult<u64> {
        let Some(shard) = self.shard(recipient_id) else {
            return Ok(0);
        };
        let mut guard = shard.write().await;
        let before = guard.len();
        guard.retain(|n| !n.is_read());
        Ok((before - guard.len()) as u64)
    }

    async fn delete_read_before(&self, cutoff: DateTime<Utc>, limit: u64) -> AppResult<u64> {
        let mut remaining = limit;
        let mut deleted = 0u64;
        for shard in self.all_shards() {
            if remaining == 0 {
                break;
            }
            let mut guard = shard.write().await;
            guard.retain(|n| {
                if remaining > 0 && n.is_expired_read(cutoff) {
                    remaining -= 1;
                    deleted += 1;
                    false
                } else {
                    true
                }
            });
        }
        Ok(deleted)
    }

    async fn stats(&self, now: DateTime<Utc>) -> AppResult<NotificationStats> {
        let mut stats = NotificationStats::default();
        for shard in self.all_shards() {
            let guard = shard.read().await;
            for n in guard.iter() {
                stats.total += 1;
                if n.is_read() {
                    stats.read += 1;
                } else {
                    stats.unread += 1;
                }
                if n.is_recent(now) {
                    stats.last_24_hours += 1;
                }
                *stats.by_category.entry(n.category()).or_insert(0) += 1;
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use orderpulse_core::types::OrderId;
    use orderpulse_entity::notification::{NotificationCategory, NotificationContext};

    fn status_notice(recipient: UserId, new_status: &str) -> Notification {
        Notification::new(
            recipient,
            "Order Status Updated",
            format!("Order status changed to {new_status}"),
            NotificationContext::OrderStatusChanged {
                order_id: OrderId::new(),
                old_status: "pending".into(),
                new_status: new_status.into(),
            },
        )
    }

    async fn seeded(recipient: UserId, count: usize) -> (MemoryNotificationRepository, Vec<Notification>) {
        let repo = MemoryNotificationRepository::new();
        let mut created = Vec::new();
        for i in 0..count {
            let mut n = status_notice(recipient, &format!("s{i}"));
            n.created_at = Utc::now() - Duration::minutes((count - i) as i64);
            repo.insert(&n).await.unwrap();
            created.push(n);
        }
        (repo, created)
    }

    #[tokio::test]
    async fn test_list_newest_first_and_paged() {
        let user = UserId::new();
        let (repo, created) = seeded(user, 5).await;

        let page = PageRequest::try_new(1, 2).unwrap();
        let (items, total) = repo.find_by_recipient(user, page, false).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, created[4].id);
        assert_eq!(items[1].id, created[3].id);

        let page = PageRequest::try_new(3, 2).unwrap();
        let (items, _) = repo.find_by_recipient(user, page, false).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, created[0].id);
    }

    #[tokio::test]
    async fn test_unread_filter() {
        let user = UserId::new();
        let (repo, created) = seeded(user, 3).await;
        repo.mark_read(created[1].id, user, Utc::now()).await.unwrap();

        let (items, total) = repo
            .find_by_recipient(user, PageRequest::default(), true)
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert!(items.iter().all(|n| !n.is_read()));
        assert_eq!(repo.count_unread(user).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_mark_read_is_owner_scoped_and_idempotent() {
        let owner = UserId::new();
        let stranger = UserId::new();
        let (repo, created) = seeded(owner, 1).await;
        let id = created[0].id;

        assert!(repo.mark_read(id, stranger, Utc::now()).await.unwrap().is_none());

        let first_at = Utc::now();
        let first = repo.mark_read(id, owner, first_at).await.unwrap().unwrap();
        let second = repo
            .mark_read(id, owner, first_at + Duration::minutes(1))
            .await
            .unwrap()
            .unwrap();
        assert!(second.is_read());
        assert_eq!(first.read_at(), second.read_at());
    }

    #[tokio::test]
    async fn test_mark_many_skips_foreign_and_read() {
        let owner = UserId::new();
        let other = UserId::new();
        let (repo, mine) = seeded(owner, 3).await;
        let foreign = status_notice(other, "shipped");
        repo.insert(&foreign).await.unwrap();
        repo.mark_read(mine[0].id, owner, Utc::now()).await.unwrap();

        let ids = vec![mine[0].id, mine[1].id, foreign.id, NotificationId::new()];
        let modified = repo.mark_many_read(owner, &ids, Utc::now()).await.unwrap();
        assert_eq!(modified, 1);
        assert_eq!(repo.count_unread(other).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_all_counts_only_unread() {
        let user = UserId::new();
        let (repo, created) = seeded(user, 8).await;
        for n in &created[..3] {
            repo.mark_read(n.id, user, Utc::now()).await.unwrap();
        }
        assert_eq!(repo.mark_all_read(user, Utc::now()).await.unwrap(), 5);
        assert_eq!(repo.count_unread(user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_and_delete_all_read() {
        let user = UserId::new();
        let (repo, created) = seeded(user, 4).await;
        assert!(repo.delete(created[0].id, user).await.unwrap());
        assert!(!repo.delete(created[0].id, user).await.unwrap());

        repo.mark_read(created[1].id, user, Utc::now()).await.unwrap();
        repo.mark_read(created[2].id, user, Utc::now()).await.unwrap();
        assert_eq!(repo.delete_all_read(user).await.unwrap(), 2);
        let (_, total) = repo
            .find_by_recipient(user, PageRequest::default(), false)
            .await
            .unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_retention_never_deletes_unread() {
        let user = UserId::new();
        let (repo, created) = seeded(user, 4).await;
        let long_ago = Utc::now() - Duration::days(40);
        repo.mark_read(created[0].id, user, long_ago).await.unwrap();
        repo.mark_read(created[1].id, user, long_ago).await.unwrap();
        repo.mark_read(created[2].id, user, Utc::now()).await.unwrap();

        let cutoff = Utc::now() - Duration::days(30);
        assert_eq!(repo.delete_read_before(cutoff, 1).await.unwrap(), 1);
        assert_eq!(repo.delete_read_before(cutoff, 10).await.unwrap(), 1);
        assert_eq!(repo.delete_read_before(cutoff, 10).await.unwrap(), 0);
        assert_eq!(repo.count_unread(user).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_stats_aggregate() {
        let user = UserId::new();
        let (repo, created) = seeded(user, 3).await;
        repo.mark_read(created[0].id, user, Utc::now()).await.unwrap();

        let stats = repo.stats(Utc::now()).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.read, 1);
        assert_eq!(stats.unread, 2);
        assert_eq!(stats.last_24_hours, 3);
        assert_eq!(
            stats.by_category.get(&NotificationCategory::OrderStatusChanged),
            Some(&3)
        );
    }

    #[tokio::test]
    async fn test_concurrent_mark_read_converges() {
        let user = UserId::new();
        let (repo, created) = seeded(user, 1).await;
        let repo = Arc::new(repo);
        let id = created[0].id;

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.mark_read(id, user, Utc::now() + Duration::seconds(i))
                        .await
                        .unwrap()
                        .unwrap()
                })
            })
            .collect();
        let results = futures::future::join_all(tasks).await;
        let read_ats: HashSet<_> = results
            .into_iter()
            .map(|r| r.unwrap().read_at())
            .collect();
        assert_eq!(read_ats.len(), 1);
    }
}

//! In-memory user directory.

use async_trait::async_trait;
use dashmap::DashMap;

use orderpulse_core::result::AppResult;
use orderpulse_core::types::UserId;
use orderpulse_entity::user::User;

use crate::repositories::UserDirectory;

/// User directory held in a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: DashMap<UserId, User>,
}

impl MemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user.
    pub fn upsert(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Remove a user.
    pub fn remove(&self, id: UserId) -> Option<User> {
        self.users.remove(&id).map(|(_, user)| user)
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_staff(&self) -> AppResult<Vec<User>> {
        let mut staff: Vec<User> = self
            .users
            .iter()
            .filter(|u| u.is_staff())
            .map(|u| u.value().clone())
            .collect();
        staff.sort_by_key(|u| u.created_at);
        Ok(staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderpulse_entity::user::UserRole;

    #[tokio::test]
    async fn test_find_staff_filters_roles() {
        let dir = MemoryUserDirectory::new();
        dir.upsert(User::new("Ana", "Admin", Some(UserRole::Admin)));
        dir.upsert(User::new("Sam", "Staff", Some(UserRole::Staff)));
        dir.upsert(User::new("Cy", "Customer", Some(UserRole::Customer)));
        dir.upsert(User::new("No", "Role", None));

        let staff = dir.find_staff().await.unwrap();
        assert_eq!(staff.len(), 2);
        assert!(staff.iter().all(User::is_staff));
    }
}

//! User entity model.

use chrono::{DateTime, Utc};
use orderpulse_core::types::UserId;
use serde::{Deserialize, Serialize};

use super::role::UserRole;

/// The slice of a user account the notification service reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role, `None` when the stored value is not recognized.
    pub role: Option<UserRole>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user record.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: Option<UserRole>,
    ) -> Self {
        Self {
            id: UserId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role,
            created_at: Utc::now(),
        }
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check if this user receives staff broadcasts.
    pub fn is_staff(&self) -> bool {
        self.role.is_some_and(|r| r.is_staff())
    }
}

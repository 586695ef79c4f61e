//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderpulse_core::error::AppError;
use orderpulse_core::types::UserId;
use orderpulse_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built from a verified credential and passed into service methods so that
/// every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The resolved role, `None` when it could not be determined.
    pub role: Option<UserRole>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: Option<UserRole>) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(|r| r.is_admin())
    }

    /// Returns whether the current user is staff (admin included).
    pub fn is_staff(&self) -> bool {
        self.role.is_some_and(|r| r.is_staff())
    }

    /// Fails with `Authorization` unless the caller is staff.
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(AppError::authorization("Staff access required"))
        }
    }

    /// Fails with `Authorization` unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::authorization("Admin access required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderpulse_core::ErrorKind;

    #[test]
    fn test_role_requirements() {
        let admin = RequestContext::new(UserId::new(), Some(UserRole::Admin));
        let staff = RequestContext::new(UserId::new(), Some(UserRole::Staff));
        let unknown = RequestContext::new(UserId::new(), None);

        assert!(admin.require_admin().is_ok());
        assert!(staff.require_staff().is_ok());
        assert_eq!(
            staff.require_admin().unwrap_err().kind,
            ErrorKind::Authorization
        );
        assert!(unknown.require_staff().is_err());
    }
}

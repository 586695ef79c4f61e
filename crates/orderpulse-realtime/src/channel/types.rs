//! Topic definitions and parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use orderpulse_core::error::AppError;
use orderpulse_core::types::UserId;
use orderpulse_entity::user::UserRole;

/// Addressable group of live sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Topic {
    /// Every session of one user, `user:<id>`.
    User(UserId),
    /// Customer-scoped topic of one user, `customer:<id>`.
    Customer(UserId),
    /// Every staff session, `admin`.
    Admin,
}

impl Topic {
    /// Topics a session joins for the given identity.
    ///
    /// Everyone joins their user topic. Staff also join `admin`, customers
    /// also join their customer topic, and an unknown role joins nothing
    /// else.
    pub fn memberships(user_id: UserId, role: Option<UserRole>) -> Vec<Topic> {
        let mut topics = vec![Topic::User(user_id)];
        match role {
            Some(r) if r.is_staff() => topics.push(Topic::Admin),
            Some(UserRole::Customer) => topics.push(Topic::Customer(user_id)),
            _ => {}
        }
        topics
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::User(id) => write!(f, "user:{id}"),
            Topic::Customer(id) => write!(f, "customer:{id}"),
            Topic::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Topic {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::invalid_argument(format!("Invalid topic: '{s}'"));
        match s.split_once(':') {
            None if s == "admin" => Ok(Topic::Admin),
            Some(("user", id)) => id.parse().map(Topic::User).map_err(|_| invalid()),
            Some(("customer", id)) => id.parse().map(Topic::Customer).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memberships_by_role() {
        let id = UserId::new();
        assert_eq!(
            Topic::memberships(id, Some(UserRole::Admin)),
            vec![Topic::User(id), Topic::Admin]
        );
        assert_eq!(
            Topic::memberships(id, Some(UserRole::Staff)),
            vec![Topic::User(id), Topic::Admin]
        );
        assert_eq!(
            Topic::memberships(id, Some(UserRole::Customer)),
            vec![Topic::User(id), Topic::Customer(id)]
        );
        assert_eq!(Topic::memberships(id, None), vec![Topic::User(id)]);
    }

    #[test]
    fn test_parse_and_display() {
        let id = UserId::new();
        for topic in [Topic::User(id), Topic::Customer(id), Topic::Admin] {
            assert_eq!(topic.to_string().parse::<Topic>().unwrap(), topic);
        }
        assert!("user:not-a-uuid".parse::<Topic>().is_err());
        assert!("folder:x".parse::<Topic>().is_err());
    }
}

//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles recognized by the notification service.
///
/// A session whose role cannot be resolved carries `None` and joins only
/// its per-user topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full administrator. Receives staff broadcasts and may run cleanup.
    Admin,
    /// Back-office staff. Receives staff broadcasts.
    #[serde(alias = "userpannel")]
    Staff,
    /// Shopper. Receives notifications about their own orders.
    Customer,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if this role receives staff broadcasts.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = orderpulse_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" | "userpannel" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            _ => Err(orderpulse_core::AppError::invalid_argument(format!(
                "Invalid user role: '{s}'. Expected one of: admin, staff, customer"
            ))),
        }
    }
}

//! Notification category enumeration.

use std::fmt;
use std::str::FromStr;

use orderpulse_core::AppError;
use serde::{Deserialize, Serialize};

/// Category of a notification. Closed set; every category has exactly one
/// matching [`NotificationContext`](super::NotificationContext) variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Customer placed an order.
    OrderCreated,
    /// Order status moved.
    OrderStatusChanged,
    /// Customer submitted a return request.
    ReturnRequestSubmitted,
    /// Return request approved.
    ReturnRequestApproved,
    /// Return request rejected.
    ReturnRequestRejected,
    /// Return completed and refund in progress.
    ReturnCompleted,
    /// Payment status moved.
    PaymentStatusChanged,
    /// Payment settled at the gateway.
    PaymentReceived,
    /// Staff mirror of [`Self::OrderCreated`].
    NewOrder,
    /// Staff mirror of [`Self::ReturnRequestSubmitted`].
    NewReturnRequest,
}

impl NotificationCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::OrderCreated,
        Self::OrderStatusChanged,
        Self::ReturnRequestSubmitted,
        Self::ReturnRequestApproved,
        Self::ReturnRequestRejected,
        Self::ReturnCompleted,
        Self::PaymentStatusChanged,
        Self::PaymentReceived,
        Self::NewOrder,
        Self::NewReturnRequest,
    ];

    /// Return the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "order_created",
            Self::OrderStatusChanged => "order_status_changed",
            Self::ReturnRequestSubmitted => "return_request_submitted",
            Self::ReturnRequestApproved => "return_request_approved",
            Self::ReturnRequestRejected => "return_request_rejected",
            Self::ReturnCompleted => "return_completed",
            Self::PaymentStatusChanged => "payment_status_changed",
            Self::PaymentReceived => "payment_received",
            Self::NewOrder => "new_order",
            Self::NewReturnRequest => "new_return_request",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::invalid_argument(format!("Unknown notification category: '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_matches_as_str() {
        for category in NotificationCategory::ALL {
            assert_eq!(category.as_str().parse::<NotificationCategory>().unwrap(), category);
        }
        assert!("order".parse::<NotificationCategory>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&NotificationCategory::NewReturnRequest).unwrap();
        assert_eq!(json, "\"new_return_request\"");
    }
}

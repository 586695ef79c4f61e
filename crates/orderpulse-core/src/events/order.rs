//! Order lifecycle events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display details of the customer who placed an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl CustomerInfo {
    /// "First Last", as shown to staff.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Events related to order lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    /// A customer placed a new order.
    Created {
        /// Initial order status.
        status: String,
        /// Order total.
        total_amount: Decimal,
        /// Number of line items.
        item_count: u32,
        /// The ordering customer.
        customer: CustomerInfo,
    },
    /// The order moved from one status to another.
    StatusChanged {
        /// The previous status.
        old_status: String,
        /// The new status.
        new_status: String,
    },
}

impl OrderEvent {
    /// Short event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "order.created",
            Self::StatusChanged { .. } => "order.status_changed",
        }
    }
}

//! Payment events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Events related to order payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentEvent {
    /// The payment status of an order changed.
    StatusChanged {
        /// New payment status (`completed`, `failed`, `refunded`, ...).
        payment_status: String,
        /// Order total.
        amount: Decimal,
    },
    /// The payment gateway reported a settled payment.
    Received {
        /// Amount paid.
        amount: Decimal,
        /// Gateway transaction reference, when known.
        transaction_id: Option<String>,
        /// Name of the first line item, used as the notice body.
        first_item_name: Option<String>,
        /// Customer display name.
        customer_name: Option<String>,
    },
}

impl PaymentEvent {
    /// Short event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StatusChanged { .. } => "payment.status_changed",
            Self::Received { .. } => "payment.received",
        }
    }
}

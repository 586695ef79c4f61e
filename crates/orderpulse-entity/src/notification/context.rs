//! Per-category notification context.
//!
//! The context is a sum type: each variant carries exactly the fields that
//! are meaningful for its category, and the category itself is derived from
//! the variant. Serialized adjacently tagged as
//! `{ "category": "...", "context": { ... } }`.

use orderpulse_core::types::OrderId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::NotificationCategory;

/// Structured data attached to a notification.
///
/// Every variant names the order it concerns. Optional fields are omitted
/// from the JSON when absent.
#[deny(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "category",
    content = "context",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum NotificationContext {
    /// Customer view of a newly placed order.
    OrderCreated {
        /// Order placed.
        order_id: OrderId,
        /// Status at creation, usually `pending`.
        order_status: String,
        /// Order total.
        total_amount: Decimal,
    },
    /// Order status transition.
    OrderStatusChanged {
        /// Order that moved.
        order_id: OrderId,
        /// Status before the transition.
        old_status: String,
        /// Status after the transition.
        new_status: String,
    },
    /// Customer view of a submitted return request.
    ReturnRequestSubmitted {
        /// Order being returned.
        order_id: OrderId,
        /// Status of the return request.
        return_status: String,
        /// Reason given by the customer.
        reason: String,
    },
    /// Staff approved a return request.
    ReturnRequestApproved {
        /// Order being returned.
        order_id: OrderId,
        /// Amount to be refunded, when already known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        refund_amount: Option<Decimal>,
        /// Note left by the reviewer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        admin_comment: Option<String>,
    },
    /// Staff rejected a return request.
    ReturnRequestRejected {
        /// Order the return was requested for.
        order_id: OrderId,
        /// Note left by the reviewer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        admin_comment: Option<String>,
    },
    /// Return received back and refund started.
    ReturnCompleted {
        /// Order returned.
        order_id: OrderId,
        /// Amount being refunded.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        refund_amount: Option<Decimal>,
    },
    /// Payment status moved.
    PaymentStatusChanged {
        /// Order the payment belongs to.
        order_id: OrderId,
        /// New payment status, e.g. `completed` or `failed`.
        payment_status: String,
        /// Payment amount.
        amount: Decimal,
    },
    /// Payment settled at the gateway.
    PaymentReceived {
        /// Order paid for.
        order_id: OrderId,
        /// Amount received.
        amount: Decimal,
        /// Gateway transaction reference.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transaction_id: Option<String>,
        /// Payer's display name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        customer_name: Option<String>,
    },
    /// Staff view of a newly placed order.
    NewOrder {
        /// Order placed.
        order_id: OrderId,
        /// Customer's full name.
        customer_name: String,
        /// Order total.
        total_amount: Decimal,
        /// Number of line items.
        item_count: u32,
    },
    /// Staff view of a submitted return request.
    NewReturnRequest {
        /// Order being returned.
        order_id: OrderId,
        /// Customer's full name.
        customer_name: String,
        /// Reason given by the customer.
        reason: String,
        /// Coarse reason bucket chosen in the return form.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason_category: Option<String>,
    },
}

impl NotificationContext {
    /// The category this context belongs to.
    pub fn category(&self) -> NotificationCategory {
        match self {
            Self::OrderCreated { .. } => NotificationCategory::OrderCreated,
            Self::OrderStatusChanged { .. } => NotificationCategory::OrderStatusChanged,
            Self::ReturnRequestSubmitted { .. } => NotificationCategory::ReturnRequestSubmitted,
            Self::ReturnRequestApproved { .. } => NotificationCategory::ReturnRequestApproved,
            Self::ReturnRequestRejected { .. } => NotificationCategory::ReturnRequestRejected,
            Self::ReturnCompleted { .. } => NotificationCategory::ReturnCompleted,
            Self::PaymentStatusChanged { .. } => NotificationCategory::PaymentStatusChanged,
            Self::PaymentReceived { .. } => NotificationCategory::PaymentReceived,
            Self::NewOrder { .. } => NotificationCategory::NewOrder,
            Self::NewReturnRequest { .. } => NotificationCategory::NewReturnRequest,
        }
    }

    /// The variant body alone, as stored in the `context` column.
    pub fn body_json(&self) -> serde_json::Value {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.remove("context").unwrap_or(serde_json::Value::Null)
            }
            _ => serde_json::Value::Null,
        }
    }

    /// Rebuild a context from its stored category and body.
    pub fn from_parts(
        category: NotificationCategory,
        body: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::json!({
            "category": category.as_str(),
            "context": body,
        }))
    }
}

//! Return-request events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::CustomerInfo;

/// Events related to return requests on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReturnEvent {
    /// The customer submitted a return request.
    Submitted {
        /// Status of the return request after submission.
        request_status: String,
        /// Free-text reason.
        reason: String,
        /// Reason category selected by the customer.
        reason_category: Option<String>,
        /// The requesting customer.
        customer: CustomerInfo,
    },
    /// Staff approved the return request.
    Approved {
        /// Amount to be refunded.
        refund_amount: Option<Decimal>,
        /// Comment left by staff.
        admin_comment: Option<String>,
    },
    /// Staff rejected the return request.
    Rejected {
        /// Comment left by staff.
        admin_comment: Option<String>,
    },
    /// The return was received and the refund is being processed.
    Completed {
        /// Amount refunded.
        refund_amount: Option<Decimal>,
    },
}

impl ReturnEvent {
    /// Short event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submitted { .. } => "return.submitted",
            Self::Approved { .. } => "return.approved",
            Self::Rejected { .. } => "return.rejected",
            Self::Completed { .. } => "return.completed",
        }
    }
}

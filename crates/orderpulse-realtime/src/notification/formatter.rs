//! Turns domain events into notification drafts: who receives what text.

use orderpulse_core::events::{DomainEvent, EventPayload, OrderEvent, PaymentEvent, ReturnEvent};
use orderpulse_core::types::UserId;
use orderpulse_entity::notification::NotificationContext;

/// Length of the order reference shown in notification text.
const ORDER_REF_LEN: usize = 6;

/// Length of the tag in payment-received titles.
const PAYMENT_TAG_LEN: usize = 3;

/// Who a draft is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// The ordering customer; pushed to their user topic.
    Customer(UserId),
    /// Every staff account; pushed once to the admin topic.
    Staff,
}

/// A notification to persist and push, not yet tied to a record.
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeDraft {
    /// Recipient group.
    pub audience: Audience,
    /// Title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Category and context.
    pub context: NotificationContext,
}

/// Formats notification text for domain events.
pub struct NotificationFormatter;

impl NotificationFormatter {
    /// Plans every notice an event produces, customer first.
    pub fn plan(event: &DomainEvent) -> Vec<NoticeDraft> {
        let order_id = event.order_id;
        let customer = Audience::Customer(event.customer_id);
        let order_ref = order_id.short_ref(ORDER_REF_LEN);

        match &event.payload {
            EventPayload::Order(OrderEvent::Created {
                status,
                total_amount,
                item_count,
                customer: info,
            }) => vec![
                NoticeDraft {
                    audience: customer,
                    title: "Order Placed Successfully".into(),
                    body: format!("Your order #{order_ref} has been placed successfully"),
                    context: NotificationContext::OrderCreated {
                        order_id,
                        order_status: status.clone(),
                        total_amount: *total_amount,
                    },
                },
                NoticeDraft {
                    audience: Audience::Staff,
                    title: "New Order Received".into(),
                    body: format!("New order from {}", info.full_name()),
                    context: NotificationContext::NewOrder {
                        order_id,
                        customer_name: info.full_name(),
                        total_amount: *total_amount,
                        item_count: *item_count,
                    },
                },
            ],
            EventPayload::Order(OrderEvent::StatusChanged {
                old_status,
                new_status,
            }) => vec![NoticeDraft {
                audience: customer,
                title: "Order Status Updated".into(),
                body: order_status_text(new_status),
                context: NotificationContext::OrderStatusChanged {
                    order_id,
                    old_status: old_status.clone(),
                    new_status: new_status.clone(),
                },
            }],
            EventPayload::Return(ReturnEvent::Submitted {
                request_status,
                reason,
                reason_category,
                customer: info,
            }) => vec![
                NoticeDraft {
                    audience: customer,
                    title: "Return Request Submitted".into(),
                    body: format!(
                        "Your return request for order #{order_ref} has been submitted"
                    ),
                    context: NotificationContext::ReturnRequestSubmitted {
                        order_id,
                        return_status: request_status.clone(),
                        reason: reason.clone(),
                    },
                },
                NoticeDraft {
                    audience: Audience::Staff,
                    title: "New Return Request".into(),
                    body: format!(
                        "Return request from {} for order #{order_ref}",
                        info.full_name()
                    ),
                    context: NotificationContext::NewReturnRequest {
                        order_id,
                        customer_name: info.full_name(),
                        reason: reason.clone(),
                        reason_category: reason_category.clone(),
                    },
                },
            ],
            EventPayload::Return(ReturnEvent::Approved {
                refund_amount,
                admin_comment,
            }) => vec![NoticeDraft {
                audience: customer,
                title: "Return Request Approved".into(),
                body: format!("Your return request for order #{order_ref} has been approved"),
                context: NotificationContext::ReturnRequestApproved {
                    order_id,
                    refund_amount: *refund_amount,
                    admin_comment: admin_comment.clone(),
                },
            }],
            EventPayload::Return(ReturnEvent::Rejected { admin_comment }) => vec![NoticeDraft {
                audience: customer,
                title: "Return Request Rejected".into(),
                body: format!("Your return request for order #{order_ref} has been rejected"),
                context: NotificationContext::ReturnRequestRejected {
                    order_id,
                    admin_comment: admin_comment.clone(),
                },
            }],
            EventPayload::Return(ReturnEvent::Completed { refund_amount }) => vec![NoticeDraft {
                audience: customer,
                title: "Return Completed".into(),
                body: format!(
                    "Your return for order #{order_ref} has been completed and refund is being processed"
                ),
                context: NotificationContext::ReturnCompleted {
                    order_id,
                    refund_amount: *refund_amount,
                },
            }],
            EventPayload::Payment(PaymentEvent::StatusChanged {
                payment_status,
                amount,
            }) => vec![NoticeDraft {
                audience: customer,
                title: "Payment Status Updated".into(),
                body: payment_status_text(payment_status),
                context: NotificationContext::PaymentStatusChanged {
                    order_id,
                    payment_status: payment_status.clone(),
                    amount: *amount,
                },
            }],
            EventPayload::Payment(PaymentEvent::Received {
                amount,
                transaction_id,
                first_item_name,
                customer_name,
            }) => {
                let tag = match transaction_id.as_deref().filter(|t| !t.is_empty()) {
                    Some(tx) => tail(tx, PAYMENT_TAG_LEN),
                    None => order_id.short_ref(PAYMENT_TAG_LEN),
                };
                vec![NoticeDraft {
                    audience: customer,
                    title: format!("Payment Received #TX-{}", tag.to_uppercase()),
                    body: first_item_name
                        .clone()
                        .filter(|name| !name.is_empty())
                        .unwrap_or_else(|| "Your order".to_string()),
                    context: NotificationContext::PaymentReceived {
                        order_id,
                        amount: *amount,
                        transaction_id: transaction_id.clone(),
                        customer_name: customer_name.clone(),
                    },
                }]
            }
        }
    }
}

/// Customer-facing text for an order status.
pub fn order_status_text(status: &str) -> String {
    match status {
        "pending" => "Your order is pending confirmation".into(),
        "confirmed" => "Your order has been confirmed and is being prepared".into(),
        "shipped" => "Your order has been shipped and is on the way".into(),
        "delivered" => "Your order has been delivered successfully".into(),
        "cancelled" => "Your order has been cancelled".into(),
        "refunded" => "Your order has been refunded".into(),
        other => format!("Order status changed to {other}"),
    }
}

/// Customer-facing text for a payment status.
pub fn payment_status_text(status: &str) -> String {
    match status {
        "completed" => "Payment completed successfully".into(),
        "failed" => "Payment failed. Please try again".into(),
        "refunded" => "Payment has been refunded".into(),
        other => format!("Payment status: {other}"),
    }
}

fn tail(s: &str, n: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderpulse_core::events::CustomerInfo;
    use orderpulse_core::types::OrderId;
    use orderpulse_entity::notification::NotificationCategory;
    use rust_decimal::Decimal;

    fn event(payload: EventPayload) -> DomainEvent {
        DomainEvent::new(OrderId::new(), UserId::new(), payload)
    }

    fn jane() -> CustomerInfo {
        CustomerInfo {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
        }
    }

    #[test]
    fn test_order_created_fans_out_to_customer_and_staff() {
        let ev = event(EventPayload::Order(OrderEvent::Created {
            status: "pending".into(),
            total_amount: Decimal::new(4999, 2),
            item_count: 2,
            customer: jane(),
        }));
        let drafts = NotificationFormatter::plan(&ev);
        assert_eq!(drafts.len(), 2);

        assert_eq!(drafts[0].audience, Audience::Customer(ev.customer_id));
        assert_eq!(drafts[0].context.category(), NotificationCategory::OrderCreated);
        assert_eq!(
            drafts[0].body,
            format!(
                "Your order #{} has been placed successfully",
                ev.order_id.short_ref(6)
            )
        );

        assert_eq!(drafts[1].audience, Audience::Staff);
        assert_eq!(drafts[1].context.category(), NotificationCategory::NewOrder);
        assert_eq!(drafts[1].body, "New order from Jane Doe");
    }

    #[test]
    fn test_status_texts() {
        let ev = event(EventPayload::Order(OrderEvent::StatusChanged {
            old_status: "pending".into(),
            new_status: "shipped".into(),
        }));
        let drafts = NotificationFormatter::plan(&ev);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "Order Status Updated");
        assert_eq!(drafts[0].body, "Your order has been shipped and is on the way");

        assert_eq!(order_status_text("on_hold"), "Order status changed to on_hold");
        assert_eq!(payment_status_text("failed"), "Payment failed. Please try again");
        assert_eq!(payment_status_text("pending"), "Payment status: pending");
    }

    #[test]
    fn test_return_submitted_mirrors_to_staff() {
        let ev = event(EventPayload::Return(ReturnEvent::Submitted {
            request_status: "pending".into(),
            reason: "Wrong size".into(),
            reason_category: Some("size".into()),
            customer: jane(),
        }));
        let drafts = NotificationFormatter::plan(&ev);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].title, "New Return Request");
        assert_eq!(
            drafts[1].body,
            format!("Return request from Jane Doe for order #{}", ev.order_id.short_ref(6))
        );
    }

    #[test]
    fn test_return_outcome_texts() {
        let cases = [
            (
                ReturnEvent::Approved {
                    refund_amount: Some(Decimal::new(2500, 2)),
                    admin_comment: Some("Unworn".into()),
                },
                NotificationCategory::ReturnRequestApproved,
                "Return Request Approved",
                "Your return request for order #{} has been approved",
            ),
            (
                ReturnEvent::Rejected {
                    admin_comment: None,
                },
                NotificationCategory::ReturnRequestRejected,
                "Return Request Rejected",
                "Your return request for order #{} has been rejected",
            ),
            (
                ReturnEvent::Completed {
                    refund_amount: Some(Decimal::new(2500, 2)),
                },
                NotificationCategory::ReturnCompleted,
                "Return Completed",
                "Your return for order #{} has been completed and refund is being processed",
            ),
        ];

        for (payload, category, title, body) in cases {
            let ev = event(EventPayload::Return(payload));
            let drafts = NotificationFormatter::plan(&ev);
            assert_eq!(drafts.len(), 1);
            assert_eq!(drafts[0].audience, Audience::Customer(ev.customer_id));
            assert_eq!(drafts[0].context.category(), category);
            assert_eq!(drafts[0].title, title);
            assert_eq!(drafts[0].body, body.replace("{}", &ev.order_id.short_ref(6)));
        }
    }

    #[test]
    fn test_payment_status_text_per_state() {
        for (status, body) in [
            ("completed", "Payment completed successfully"),
            ("failed", "Payment failed. Please try again"),
            ("refunded", "Payment has been refunded"),
            ("authorized", "Payment status: authorized"),
        ] {
            let ev = event(EventPayload::Payment(PaymentEvent::StatusChanged {
                payment_status: status.into(),
                amount: Decimal::new(4999, 2),
            }));
            let drafts = NotificationFormatter::plan(&ev);
            assert_eq!(drafts.len(), 1);
            assert_eq!(drafts[0].title, "Payment Status Updated");
            assert_eq!(drafts[0].body, body);
        }
    }

    #[test]
    fn test_payment_received_tag() {
        let ev = event(EventPayload::Payment(PaymentEvent::Received {
            amount: Decimal::new(100, 0),
            transaction_id: Some("pay_Nx81abc".into()),
            first_item_name: Some("Trail Runner".into()),
            customer_name: None,
        }));
        let drafts = NotificationFormatter::plan(&ev);
        assert_eq!(drafts[0].title, "Payment Received #TX-ABC");
        assert_eq!(drafts[0].body, "Trail Runner");

        let ev = event(EventPayload::Payment(PaymentEvent::Received {
            amount: Decimal::new(100, 0),
            transaction_id: None,
            first_item_name: None,
            customer_name: None,
        }));
        let drafts = NotificationFormatter::plan(&ev);
        assert_eq!(
            drafts[0].title,
            format!("Payment Received #TX-{}", ev.order_id.short_ref(3).to_uppercase())
        );
        assert_eq!(drafts[0].body, "Your order");
    }
}

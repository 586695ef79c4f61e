//! Domain events emitted by the commerce system.
//!
//! Events are handed to the notification dispatcher, which turns each one
//! into persisted notifications and realtime pushes.

pub mod order;
pub mod payment;
pub mod returns;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{EventId, OrderId, UserId};

pub use order::{CustomerInfo, OrderEvent};
pub use payment::PaymentEvent;
pub use returns::ReturnEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID, used to reconcile failed deliveries.
    pub id: EventId,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The order the event concerns.
    pub order_id: OrderId,
    /// The customer who owns the order.
    pub customer_id: UserId,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum EventPayload {
    /// An order lifecycle event.
    Order(OrderEvent),
    /// A return-request event.
    Return(ReturnEvent),
    /// A payment event.
    Payment(PaymentEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(order_id: OrderId, customer_id: UserId, payload: EventPayload) -> Self {
        Self {
            id: EventId::new(),
            timestamp: Utc::now(),
            order_id,
            customer_id,
            payload,
        }
    }

    /// Short event name for logs.
    pub fn name(&self) -> &'static str {
        match &self.payload {
            EventPayload::Order(e) => e.name(),
            EventPayload::Return(e) => e.name(),
            EventPayload::Payment(e) => e.name(),
        }
    }
}

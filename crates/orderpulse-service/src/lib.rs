//! # orderpulse-service
//!
//! Service layer for OrderPulse notifications.
//!
//! [`NotificationStore`] owns the notification record lifecycle: it validates
//! input and enforces recipient scoping on top of a repository.
//! [`DeliveryQueryApi`] is the read side for offline and reconnecting
//! clients; every call is scoped to the [`RequestContext`] of the caller.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod notification;

pub use context::RequestContext;
pub use notification::{
    DeliveryQueryApi, ListQuery, NotificationListing, NotificationStore, Pagination,
};

//! Notification record lifecycle and the read-side query API.

pub mod query;
pub mod store;

pub use query::{DeliveryQueryApi, ListQuery, NotificationListing, Pagination};
pub use store::NotificationStore;

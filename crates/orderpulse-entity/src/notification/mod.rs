//! Notification domain entities.

pub mod category;
pub mod context;
pub mod model;
pub mod stats;

pub use category::NotificationCategory;
pub use context::NotificationContext;
pub use model::Notification;
pub use stats::NotificationStats;

//! # orderpulse-database
//!
//! Notification store persistence. The [`NotificationRepository`] and
//! [`UserDirectory`] traits are implemented twice: against PostgreSQL via
//! `sqlx`, and in process memory for tests and single-node deployments.

pub mod connection;
pub mod error;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::{MemoryNotificationRepository, MemoryUserDirectory};
pub use repositories::{
    NotificationRepository, PgNotificationRepository, PgUserDirectory, UserDirectory,
};

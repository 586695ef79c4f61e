//! Scheduled maintenance tasks for OrderPulse.
//!
//! This crate provides:
//! - A cron scheduler that owns the periodic tasks
//! - The notification retention job that purges old read notifications

pub mod jobs;
pub mod scheduler;

pub use jobs::RetentionJob;
pub use scheduler::CronScheduler;

//! # orderpulse-entity
//!
//! Domain entity models for OrderPulse. The notification record, its
//! per-category context, aggregate statistics, and the user roles that
//! decide which realtime topics a session joins.

pub mod notification;
pub mod user;

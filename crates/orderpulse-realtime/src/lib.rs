//! # orderpulse-realtime
//!
//! Realtime delivery engine for OrderPulse. Provides:
//!
//! - Handshake identity gate over JWT credentials with role resolution
//! - Topic fan-out to per-user, per-customer, and staff groups
//! - Bounded per-session outbound buffers that never block a publisher
//! - The order event dispatcher that persists and pushes notifications

pub mod channel;
pub mod connection;
pub mod message;
pub mod metrics;
pub mod notification;
pub mod server;

pub use channel::{ChannelRegistry, Topic};
pub use connection::{ConnectionManager, PublishOutcome, Session, SessionIdentity};
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use notification::NotificationDispatcher;
pub use server::RealtimeEngine;

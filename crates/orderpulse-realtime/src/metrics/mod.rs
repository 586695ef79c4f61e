//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Sessions ever opened.
    pub connections_total: AtomicU64,
    /// Sessions currently open.
    pub connections_active: AtomicU64,
    /// Credentials refused by the identity gate.
    pub connections_rejected: AtomicU64,
    /// Frames queued to sessions.
    pub messages_sent: AtomicU64,
    /// Frames dropped because a session buffer was full or closed.
    pub messages_dropped: AtomicU64,
    /// Frames received from clients.
    pub messages_received: AtomicU64,
    /// Publishes to topics with no members.
    pub publishes_skipped: AtomicU64,
    /// Sessions admitted with an unresolved role.
    pub role_lookups_degraded: AtomicU64,
    /// Notifications persisted by the dispatcher.
    pub notifications_persisted: AtomicU64,
    /// Notifications the dispatcher failed to persist.
    pub persistence_failures: AtomicU64,
    /// Domain events dispatched.
    pub events_dispatched: AtomicU64,
}

impl EngineMetrics {
    /// Create new zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new session.
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a closed session.
    pub fn connection_closed(&self) {
        // Saturating: a racing close must never wrap the gauge.
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_sub(1));
    }

    /// Record a refused handshake.
    pub fn connection_rejected(&self) {
        self.connections_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record frames queued to sessions.
    pub fn messages_sent(&self, n: u64) {
        self.messages_sent.fetch_add(n, Ordering::Relaxed);
    }

    /// Record dropped frames.
    pub fn messages_dropped(&self, n: u64) {
        self.messages_dropped.fetch_add(n, Ordering::Relaxed);
    }

    /// Record an inbound frame.
    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a publish to an empty topic.
    pub fn publish_skipped(&self) {
        self.publishes_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a session admitted without a resolvable role.
    pub fn role_lookup_degraded(&self) {
        self.role_lookups_degraded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a persisted notification.
    pub fn notification_persisted(&self) {
        self.notifications_persisted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed persistence attempt.
    pub fn persistence_failed(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dispatched domain event.
    pub fn event_dispatched(&self) {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            connections_rejected: self.connections_rejected.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            publishes_skipped: self.publishes_skipped.load(Ordering::Relaxed),
            role_lookups_degraded: self.role_lookups_degraded.load(Ordering::Relaxed),
            notifications_persisted: self.notifications_persisted.load(Ordering::Relaxed),
            persistence_failures: self.persistence_failures.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Sessions ever opened.
    pub connections_total: u64,
    /// Sessions currently open.
    pub connections_active: u64,
    /// Handshakes refused.
    pub connections_rejected: u64,
    /// Frames queued.
    pub messages_sent: u64,
    /// Frames dropped.
    pub messages_dropped: u64,
    /// Frames received.
    pub messages_received: u64,
    /// Publishes to empty topics.
    pub publishes_skipped: u64,
    /// Role degradations.
    pub role_lookups_degraded: u64,
    /// Notifications persisted.
    pub notifications_persisted: u64,
    /// Persistence failures.
    pub persistence_failures: u64,
    /// Domain events dispatched.
    pub events_dispatched: u64,
}

//! Reverse index: which topics each session has joined.

use std::collections::HashSet;

use dashmap::DashMap;

use orderpulse_core::types::SessionId;

use super::types::Topic;

/// Tracks session-to-topic memberships.
#[derive(Debug, Default)]
pub struct SubscriptionTracker {
    session_to_topics: DashMap<SessionId, HashSet<Topic>>,
}

impl SubscriptionTracker {
    /// Creates a new subscription tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a membership.
    pub fn add(&self, session_id: SessionId, topic: Topic) {
        self.session_to_topics
            .entry(session_id)
            .or_default()
            .insert(topic);
    }

    /// Removes all memberships for a session.
    pub fn remove_all(&self, session_id: SessionId) -> HashSet<Topic> {
        self.session_to_topics
            .remove(&session_id)
            .map(|(_, topics)| topics)
            .unwrap_or_default()
    }
}

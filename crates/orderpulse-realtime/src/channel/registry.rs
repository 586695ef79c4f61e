//! Topic registry: manages all topics and their memberships.

use dashmap::DashMap;

use orderpulse_core::types::SessionId;

use super::channel::Channel;
use super::subscription::SubscriptionTracker;
use super::types::Topic;

/// Registry of all topics that currently have members.
///
/// Empty topics are removed eagerly so the map only holds live groups.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: DashMap<Topic, Channel>,
    subscriptions: SubscriptionTracker,
}

impl ChannelRegistry {
    /// Creates a new registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins a session to a topic.
    pub fn join(&self, topic: Topic, session_id: SessionId) {
        self.channels
            .entry(topic)
            .or_insert_with(|| Channel::new(topic))
            .join(session_id);
        self.subscriptions.add(session_id, topic);
    }

    /// Removes a session from every topic it joined. Safe to call repeatedly.
    pub fn leave_all(&self, session_id: SessionId) -> usize {
        let topics = self.subscriptions.remove_all(session_id);
        for topic in &topics {
            self.channels.remove_if_mut(topic, |_, channel| {
                channel.leave(session_id);
                channel.is_empty()
            });
        }
        topics.len()
    }

    /// Returns all member session IDs of a topic.
    pub fn members(&self, topic: &Topic) -> Vec<SessionId> {
        self.channels
            .get(topic)
            .map(|ch| ch.member_ids())
            .unwrap_or_default()
    }

    /// Returns member count for a topic.
    pub fn member_count(&self, topic: &Topic) -> usize {
        self.channels
            .get(topic)
            .map(|ch| ch.members.len())
            .unwrap_or(0)
    }

    /// Returns total number of live topics.
    pub fn topic_count(&self) -> usize {
        self.channels.len()
    }
}

//! Membership set of a single topic.

use std::collections::HashSet;

use orderpulse_core::types::SessionId;

use super::types::Topic;

/// A single topic with the sessions currently joined to it.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Topic this channel serves.
    pub topic: Topic,
    /// Joined session IDs.
    pub members: HashSet<SessionId>,
}

impl Channel {
    /// Creates a new empty channel.
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            members: HashSet::new(),
        }
    }

    /// Adds a member. Returns `false` if it was already present.
    pub fn join(&mut self, session_id: SessionId) -> bool {
        self.members.insert(session_id)
    }

    /// Removes a member.
    pub fn leave(&mut self, session_id: SessionId) {
        self.members.remove(&session_id);
    }

    /// Returns whether the channel has any members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns all member session IDs.
    pub fn member_ids(&self) -> Vec<SessionId> {
        self.members.iter().copied().collect()
    }
}

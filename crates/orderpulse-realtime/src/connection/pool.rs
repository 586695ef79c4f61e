//! Connection pool: tracks all live sessions indexed by user and by id.

use std::sync::Arc;

use dashmap::DashMap;

use orderpulse_core::types::{SessionId, UserId};

use super::handle::ConnectionHandle;

/// Thread-safe pool of all live sessions.
///
/// Publish resolves topic members through this pool, so a session removed
/// here is unreachable even if a stale membership lingers.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    by_user: DashMap<UserId, Vec<Arc<ConnectionHandle>>>,
    by_id: DashMap<SessionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a session to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, Arc::clone(&handle));
        self.by_user.entry(handle.user_id).or_default().push(handle);
    }

    /// Removes a session from the pool. Returns `None` if already gone.
    pub fn remove(&self, session_id: &SessionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(session_id)?;
        self.by_user.remove_if_mut(&handle.user_id, |_, sessions| {
            sessions.retain(|s| s.id != *session_id);
            sessions.is_empty()
        });
        Some(handle)
    }

    /// Gets all sessions for a user, oldest first.
    pub fn user_sessions(&self, user_id: &UserId) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Gets a specific session by ID.
    pub fn get(&self, session_id: &SessionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(session_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether the session is still pooled.
    pub fn contains(&self, session_id: &SessionId) -> bool {
        self.by_id.contains_key(session_id)
    }

    /// Returns total number of live sessions.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Returns all session handles.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }
}

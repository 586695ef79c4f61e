//! Individual realtime session handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Notify, mpsc};

use orderpulse_core::types::{SessionId, UserId};
use orderpulse_entity::user::UserRole;

/// Result of queuing a frame on one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushResult {
    /// The frame was queued.
    Queued,
    /// The outbound buffer was full; the frame was dropped.
    Full,
    /// The session is gone.
    Closed,
}

/// A handle to a single live session.
///
/// Holds the sender side of the session's bounded outbound buffer plus the
/// identity bound at handshake time.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique session ID.
    pub id: SessionId,
    /// User who owns this session.
    pub user_id: UserId,
    /// Role resolved at handshake, `None` when unknown.
    pub role: Option<UserRole>,
    /// When the session was established.
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<String>,
    alive: AtomicBool,
    closed: Notify,
}

impl ConnectionHandle {
    /// Create a new session handle.
    pub fn new(user_id: UserId, role: Option<UserRole>, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            role,
            connected_at: Utc::now(),
            sender,
            alive: AtomicBool::new(true),
            closed: Notify::new(),
        }
    }

    /// Queue a frame without waiting. Never blocks on the client.
    pub fn try_push(&self, frame: String) -> PushResult {
        if !self.is_alive() {
            return PushResult::Closed;
        }
        match self.sender.try_send(frame) {
            Ok(()) => PushResult::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(
                    session_id = %self.id,
                    user_id = %self.user_id,
                    "Session send buffer full, dropping message"
                );
                PushResult::Full
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.alive.store(false, Ordering::SeqCst);
                PushResult::Closed
            }
        }
    }

    /// Check if the session is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst) && !self.sender.is_closed()
    }

    /// Mark the session closed and wake whoever is waiting in [`Self::closed`].
    pub fn close(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.closed.notify_one();
    }

    /// Resolves once [`Self::close`] has been called.
    pub async fn closed(&self) {
        if !self.alive.load(Ordering::SeqCst) {
            return;
        }
        self.closed.notified().await;
    }

    /// Get a snapshot of session info.
    pub fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id,
            user_id: self.user_id,
            role: self.role,
            connected_at: self.connected_at,
            alive: self.is_alive(),
        }
    }
}

/// Snapshot of session info (serializable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Session ID.
    pub id: SessionId,
    /// User ID.
    pub user_id: UserId,
    /// Role.
    pub role: Option<UserRole>,
    /// Connected at.
    pub connected_at: DateTime<Utc>,
    /// Is alive.
    pub alive: bool,
}

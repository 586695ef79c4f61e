//! Connection manager: session lifecycle, topic membership, and fan-out.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use orderpulse_core::config::RealtimeConfig;
use orderpulse_core::error::AppError;
use orderpulse_core::types::{SessionId, UserId};

use crate::channel::{ChannelRegistry, Topic};
use crate::message::{
    ConnectedPayload, EVENT_CONNECTED, EVENT_ERROR, EVENT_PONG, ErrorPayload, InboundMessage,
    ServerFrame, validate_inbound,
};
use crate::metrics::EngineMetrics;

use super::authenticator::{IdentityGate, SessionIdentity};
use super::handle::{ConnectionHandle, PushResult};
use super::pool::ConnectionPool;

/// A freshly registered session: the handle plus the receiving end of its
/// outbound buffer, which the transport drains.
#[derive(Debug)]
pub struct Session {
    /// Session handle.
    pub handle: Arc<ConnectionHandle>,
    /// Outbound frames, already serialized.
    pub receiver: mpsc::Receiver<String>,
}

/// Result of a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The frame reached the topic's members.
    Delivered {
        /// Sessions that queued the frame.
        delivered: usize,
        /// Sessions whose buffer was full or closed.
        dropped: usize,
    },
    /// The topic had no members.
    Skipped,
}

/// Manages all live sessions.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: ConnectionPool,
    channels: Arc<ChannelRegistry>,
    gate: IdentityGate,
    metrics: Arc<EngineMetrics>,
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        gate: IdentityGate,
        channels: Arc<ChannelRegistry>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            pool: ConnectionPool::new(),
            channels,
            gate,
            metrics,
            config,
        }
    }

    /// Authenticates a handshake and registers the session.
    ///
    /// No topic is joined unless the credential verifies.
    pub async fn connect(&self, credential: Option<&str>) -> Result<Session, AppError> {
        let identity = self.gate.authenticate(credential).await?;
        self.register(identity)
    }

    /// Registers an authenticated session, queues the `connected` frame and
    /// then joins its topics, so `connected` is always the first frame out.
    pub fn register(&self, identity: SessionIdentity) -> Result<Session, AppError> {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(identity.user_id, identity.role, tx));

        let welcome = ServerFrame::new(
            EVENT_CONNECTED,
            ConnectedPayload {
                message: self.config.welcome_message.clone(),
                user_id: identity.user_id,
                role: identity.role,
            },
        )
        .to_text()?;

        self.enforce_user_cap(&identity.user_id);

        self.pool.add(Arc::clone(&handle));
        self.metrics.connection_opened();
        self.push(&handle, welcome);

        for topic in Topic::memberships(identity.user_id, identity.role) {
            self.channels.join(topic, handle.id);
        }

        // A disconnect racing the joins above may have left memberships
        // behind for a session that is no longer pooled.
        if !self.pool.contains(&handle.id) {
            self.channels.leave_all(handle.id);
            return Err(AppError::internal("Session closed during registration"));
        }

        info!(
            session_id = %handle.id,
            user_id = %identity.user_id,
            role = identity.role.map(|r| r.as_str()).unwrap_or("unknown"),
            "Realtime session registered"
        );

        Ok(Session {
            handle,
            receiver: rx,
        })
    }

    fn enforce_user_cap(&self, user_id: &UserId) {
        let max = self.config.max_connections_per_user;
        if max == 0 {
            return;
        }
        let existing = self.pool.user_sessions(user_id);
        if existing.len() < max {
            return;
        }
        warn!(
            user_id = %user_id,
            count = existing.len(),
            max,
            "User at max sessions, closing oldest"
        );
        let excess = existing.len() + 1 - max;
        for oldest in existing.iter().take(excess) {
            oldest.close();
            self.disconnect(&oldest.id);
        }
    }

    /// Removes a session and every membership it holds. Idempotent.
    pub fn disconnect(&self, session_id: &SessionId) -> bool {
        let Some(handle) = self.pool.remove(session_id) else {
            return false;
        };
        handle.close();
        let left = self.channels.leave_all(*session_id);
        self.metrics.connection_closed();

        info!(
            session_id = %session_id,
            user_id = %handle.user_id,
            topics = left,
            "Realtime session closed"
        );
        true
    }

    /// Serializes `payload` once and queues it on every live member of
    /// `topic`. Slow or dead members never hold up the others.
    pub fn publish<T: Serialize>(
        &self,
        topic: &Topic,
        event: &str,
        payload: &T,
    ) -> Result<PublishOutcome, AppError> {
        let members = self.channels.members(topic);
        if members.is_empty() {
            self.metrics.publish_skipped();
            debug!(topic = %topic, event, "No members on topic, skipping publish");
            return Ok(PublishOutcome::Skipped);
        }

        let frame = ServerFrame::new(event, payload).to_text()?;

        let mut delivered = 0;
        let mut dropped = 0;
        for session_id in members {
            let Some(handle) = self.pool.get(&session_id) else {
                continue;
            };
            if self.push(&handle, frame.clone()) {
                delivered += 1;
            } else {
                dropped += 1;
            }
        }

        if delivered == 0 && dropped == 0 {
            self.metrics.publish_skipped();
            return Ok(PublishOutcome::Skipped);
        }

        debug!(topic = %topic, event, delivered, dropped, "Published to topic");
        Ok(PublishOutcome::Delivered { delivered, dropped })
    }

    fn push(&self, handle: &ConnectionHandle, frame: String) -> bool {
        match handle.try_push(frame) {
            PushResult::Queued => {
                self.metrics.messages_sent(1);
                true
            }
            PushResult::Full => {
                self.metrics.messages_dropped(1);
                false
            }
            PushResult::Closed => {
                self.metrics.messages_dropped(1);
                self.disconnect(&handle.id);
                false
            }
        }
    }

    /// Processes a text frame received from a client.
    pub fn handle_inbound(&self, session_id: &SessionId, raw: &str) {
        let Some(handle) = self.pool.get(session_id) else {
            warn!(session_id = %session_id, "Message from unknown session");
            return;
        };
        self.metrics.message_received();

        let parsed = validate_inbound(raw, self.config.max_inbound_message_bytes)
            .and_then(|()| serde_json::from_str::<InboundMessage>(raw).map_err(AppError::from));

        let reply = match parsed {
            Ok(InboundMessage::Ping) => ServerFrame::new(EVENT_PONG, serde_json::json!({})).to_text(),
            Err(e) => {
                debug!(session_id = %session_id, error = %e, "Rejected inbound message");
                ServerFrame::new(
                    EVENT_ERROR,
                    ErrorPayload {
                        code: "INVALID_MESSAGE".to_string(),
                        message: e.message,
                    },
                )
                .to_text()
            }
        };

        match reply {
            Ok(frame) => {
                self.push(&handle, frame);
            }
            Err(e) => warn!(session_id = %session_id, error = %e, "Failed to encode reply"),
        }
    }

    /// Closes every session.
    pub fn close_all(&self) {
        let sessions = self.pool.all_connections();
        let count = sessions.len();
        for handle in sessions {
            self.disconnect(&handle.id);
        }
        info!(count, "All realtime sessions closed");
    }

    /// Gets a session by id.
    pub fn get(&self, session_id: &SessionId) -> Option<Arc<ConnectionHandle>> {
        self.pool.get(session_id)
    }

    /// Live sessions for a user.
    pub fn user_sessions(&self, user_id: &UserId) -> Vec<Arc<ConnectionHandle>> {
        self.pool.user_sessions(user_id)
    }

    /// Number of live sessions.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Number of distinct connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Channel registry.
    pub fn channels(&self) -> &Arc<ChannelRegistry> {
        &self.channels
    }

    /// Identity gate used for handshakes.
    pub fn gate(&self) -> &IdentityGate {
        &self.gate
    }
}

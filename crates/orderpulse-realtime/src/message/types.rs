//! Inbound and outbound WebSocket message type definitions.
//!
//! Every frame is a JSON object `{ "event": <name>, "data": <payload> }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderpulse_core::types::{NotificationId, UserId};
use orderpulse_entity::notification::{Notification, NotificationContext};
use orderpulse_entity::user::UserRole;

/// Event name of the handshake acknowledgement.
pub const EVENT_CONNECTED: &str = "connected";
/// Event name of a notification push.
pub const EVENT_NOTIFICATION: &str = "order:notification";
/// Event name of a keepalive reply.
pub const EVENT_PONG: &str = "pong";
/// Event name of an error report.
pub const EVENT_ERROR: &str = "error";

/// A serialized server frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerFrame<T> {
    /// Event name.
    pub event: String,
    /// Event payload.
    pub data: T,
}

impl<T: Serialize> ServerFrame<T> {
    /// Builds a frame.
    pub fn new(event: impl Into<String>, data: T) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Serializes the frame to JSON text.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Payload of the `connected` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedPayload {
    /// Greeting text.
    pub message: String,
    /// The authenticated user.
    pub user_id: UserId,
    /// The resolved role, `null` when unknown.
    pub role: Option<UserRole>,
}

/// Payload of an `order:notification` push.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPush {
    /// Persisted record id. Absent when nothing was persisted for this
    /// frame, either because storage failed or because the frame is a staff
    /// broadcast covering several records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NotificationId>,
    /// Title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Category and context.
    #[serde(flatten)]
    pub context: NotificationContext,
    /// Read flag; pushes are always unread.
    pub read: bool,
    /// When the notification was produced.
    pub timestamp: DateTime<Utc>,
}

impl NotificationPush {
    /// A push that was not (or could not be) tied to a single record.
    pub fn unsaved(title: String, body: String, context: NotificationContext) -> Self {
        Self {
            id: None,
            title,
            body,
            context,
            read: false,
            timestamp: Utc::now(),
        }
    }
}

impl From<&Notification> for NotificationPush {
    fn from(n: &Notification) -> Self {
        Self {
            id: Some(n.id),
            title: n.title.clone(),
            body: n.body.clone(),
            context: n.context.clone(),
            read: n.is_read(),
            timestamp: n.created_at,
        }
    }
}

/// Payload of an `error` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Machine-readable code.
    pub code: String,
    /// Description.
    pub message: String,
}

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Keepalive; answered with `pong`.
    Ping,
}

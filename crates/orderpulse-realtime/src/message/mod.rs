//! WebSocket message types and validation.

pub mod types;
pub mod validator;

pub use types::{
    ConnectedPayload, EVENT_CONNECTED, EVENT_ERROR, EVENT_NOTIFICATION, EVENT_PONG, ErrorPayload,
    InboundMessage, NotificationPush, ServerFrame,
};
pub use validator::validate_inbound;

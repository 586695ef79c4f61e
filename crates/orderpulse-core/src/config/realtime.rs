//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Maximum concurrent sessions per user; the oldest is evicted beyond it.
    #[serde(default = "default_max_connections_per_user")]
    pub max_connections_per_user: usize,
    /// Outbound buffer per session. A full buffer drops new pushes.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Message sent in the `connected` acknowledgement.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
    /// Maximum inbound frame size accepted from clients, in bytes.
    #[serde(default = "default_max_inbound")]
    pub max_inbound_message_bytes: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            max_connections_per_user: default_max_connections_per_user(),
            channel_buffer_size: default_channel_buffer(),
            welcome_message: default_welcome_message(),
            max_inbound_message_bytes: default_max_inbound(),
        }
    }
}

fn default_max_connections_per_user() -> usize {
    10
}

fn default_channel_buffer() -> usize {
    256
}

fn default_welcome_message() -> String {
    "Connected to order notification service".to_string()
}

fn default_max_inbound() -> usize {
    4096
}

//! Database configuration.

use serde::{Deserialize, Serialize};

/// PostgreSQL pool configuration for the notification store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of idle connections kept open.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Acquire timeout in seconds. Exceeding it surfaces `StorageUnavailable`.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    /// Whether embedded migrations run at startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod notifications;
pub mod realtime;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::notifications::NotificationsConfig;
pub use self::realtime::RealtimeConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Which notification store backs the deployment.
    #[serde(default)]
    pub storage_backend: StorageBackend,
    /// Database connection settings (required for the `postgres` backend).
    pub database: Option<DatabaseConfig>,
    /// Credential verification settings.
    pub auth: AuthConfig,
    /// Real-time WebSocket settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Notification store and retention settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backing store selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL via sqlx.
    #[default]
    Postgres,
    /// Process-local store; state is lost on restart.
    Memory,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `ORDERPULSE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ORDERPULSE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject combinations that would only fail later at startup.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.storage_backend == StorageBackend::Postgres && self.database.is_none() {
            return Err(AppError::configuration(
                "storage_backend = \"postgres\" requires a [database] section",
            ));
        }
        if self.auth.jwt_secret.len() < 16 {
            return Err(AppError::configuration(
                "auth.jwt_secret must be at least 16 bytes",
            ));
        }
        if self.notifications.retention_batch_size == 0 {
            return Err(AppError::configuration(
                "notifications.retention_batch_size must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            storage_backend: StorageBackend::Memory,
            database: None,
            auth: AuthConfig {
                jwt_secret: "0123456789abcdef0123".to_string(),
                leeway_seconds: 5,
            },
            realtime: RealtimeConfig::default(),
            notifications: NotificationsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_memory_backend_needs_no_database() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_postgres_backend_requires_database() {
        let mut config = base();
        config.storage_backend = StorageBackend::Postgres;
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = base();
        config.auth.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }
}

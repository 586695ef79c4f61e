//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use orderpulse_auth::JwtDecoder;
use orderpulse_core::config::{AppConfig, StorageBackend};
use orderpulse_core::error::AppError;
use orderpulse_database::{
    DatabasePool, MemoryNotificationRepository, MemoryUserDirectory, NotificationRepository,
    PgNotificationRepository, PgUserDirectory, UserDirectory,
};
use orderpulse_realtime::{NotificationDispatcher, RealtimeEngine};
use orderpulse_service::{DeliveryQueryApi, NotificationStore};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool, absent on the memory backend
    pub database: Option<DatabasePool>,
    /// Notification record lifecycle
    pub store: Arc<NotificationStore>,
    /// Caller-scoped read side
    pub queries: Arc<DeliveryQueryApi>,
    /// Realtime engine
    pub realtime: Arc<RealtimeEngine>,
    /// Domain event dispatcher
    pub dispatcher: Arc<NotificationDispatcher>,
    /// When the state was built
    pub started_at: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("storage_backend", &self.config.storage_backend)
            .field("realtime", &self.realtime)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires services over the given repositories.
    pub fn new(
        config: AppConfig,
        repo: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserDirectory>,
        database: Option<DatabasePool>,
    ) -> Self {
        let decoder = Arc::new(JwtDecoder::new(&config.auth));
        let store = Arc::new(NotificationStore::new(repo, &config.notifications));
        let queries = Arc::new(DeliveryQueryApi::new(
            Arc::clone(&store),
            config.notifications.retention_days,
        ));
        let realtime = Arc::new(RealtimeEngine::new(
            config.realtime.clone(),
            decoder,
            Arc::clone(&users),
        ));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&store),
            users,
            Arc::clone(&realtime),
        ));

        Self {
            config: Arc::new(config),
            database,
            store,
            queries,
            realtime,
            dispatcher,
            started_at: Instant::now(),
        }
    }

    /// Builds state for the configured storage backend, connecting and
    /// migrating PostgreSQL when selected.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppError> {
        match config.storage_backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory notification store; data is lost on restart");
                Ok(Self::new(
                    config,
                    Arc::new(MemoryNotificationRepository::new()),
                    Arc::new(MemoryUserDirectory::new()),
                    None,
                ))
            }
            StorageBackend::Postgres => {
                let db_config = config.database.clone().ok_or_else(|| {
                    AppError::configuration("storage_backend = \"postgres\" requires [database]")
                })?;
                let database = DatabasePool::connect(&db_config).await?;
                if db_config.run_migrations {
                    orderpulse_database::migration::run_migrations(database.pool()).await?;
                }
                let pool = database.pool().clone();
                Ok(Self::new(
                    config,
                    Arc::new(PgNotificationRepository::new(pool.clone())),
                    Arc::new(PgUserDirectory::new(pool)),
                    Some(database),
                ))
            }
        }
    }
}

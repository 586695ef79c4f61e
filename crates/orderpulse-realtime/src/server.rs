//! Top-level realtime engine that ties together all subsystems.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::info;

use orderpulse_auth::JwtDecoder;
use orderpulse_core::config::RealtimeConfig;
use orderpulse_core::error::AppError;
use orderpulse_core::types::SessionId;
use orderpulse_database::UserDirectory;

use crate::channel::{ChannelRegistry, Topic};
use crate::connection::authenticator::IdentityGate;
use crate::connection::manager::{ConnectionManager, PublishOutcome, Session};
use crate::metrics::EngineMetrics;

/// Central realtime engine.
///
/// Constructed explicitly and shared as `Arc<RealtimeEngine>`. Handshakes
/// and publishes are refused with `NotInitialized` until [`Self::start`] is
/// called and again after [`Self::shutdown`].
pub struct RealtimeEngine {
    connections: Arc<ConnectionManager>,
    channels: Arc<ChannelRegistry>,
    metrics: Arc<EngineMetrics>,
    running: AtomicBool,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("running", &self.is_running())
            .field("sessions", &self.connections.connection_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new engine with all subsystems. The engine starts stopped.
    pub fn new(
        config: RealtimeConfig,
        decoder: Arc<JwtDecoder>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        let metrics = Arc::new(EngineMetrics::new());
        let channels = Arc::new(ChannelRegistry::new());
        let gate = IdentityGate::new(decoder, users, Arc::clone(&metrics));
        let connections = Arc::new(ConnectionManager::new(
            config,
            gate,
            Arc::clone(&channels),
            Arc::clone(&metrics),
        ));

        Self {
            connections,
            channels,
            metrics,
            running: AtomicBool::new(false),
        }
    }

    /// Marks the engine ready for handshakes and publishes.
    pub fn start(&self) {
        if !self.running.swap(true, Ordering::SeqCst) {
            info!("Realtime engine started");
        }
    }

    /// Whether the engine accepts work.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn ensure_running(&self) -> Result<(), AppError> {
        if self.is_running() {
            Ok(())
        } else {
            Err(AppError::not_initialized("Realtime engine is not running"))
        }
    }

    /// Authenticates a handshake and registers the session.
    pub async fn connect(&self, credential: Option<&str>) -> Result<Session, AppError> {
        self.ensure_running()?;
        self.connections.connect(credential).await
    }

    /// Releases a session. Idempotent.
    pub fn disconnect(&self, session_id: &SessionId) -> bool {
        self.connections.disconnect(session_id)
    }

    /// Handles a text frame received from a session.
    pub fn handle_inbound(&self, session_id: &SessionId, raw: &str) {
        self.connections.handle_inbound(session_id, raw);
    }

    /// Pushes an event to every session on `topic`.
    pub fn publish<T: Serialize>(
        &self,
        topic: &Topic,
        event: &str,
        payload: &T,
    ) -> Result<PublishOutcome, AppError> {
        self.ensure_running()?;
        self.connections.publish(topic, event, payload)
    }

    /// Identity gate shared by handshakes and the HTTP read side.
    pub fn gate(&self) -> &IdentityGate {
        self.connections.gate()
    }

    /// Connection manager.
    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    /// Channel registry.
    pub fn channels(&self) -> &Arc<ChannelRegistry> {
        &self.channels
    }

    /// Metrics collector.
    pub fn metrics(&self) -> &Arc<EngineMetrics> {
        &self.metrics
    }

    /// Stops accepting work and closes every session.
    pub fn shutdown(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        info!("Shutting down realtime engine");

        self.connections.close_all();

        info!("Realtime engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderpulse_core::config::AuthConfig;
    use orderpulse_core::error::ErrorKind;
    use orderpulse_core::types::UserId;
    use orderpulse_database::MemoryUserDirectory;

    fn engine() -> RealtimeEngine {
        let decoder = Arc::new(JwtDecoder::new(&AuthConfig {
            jwt_secret: "engine-test-secret".into(),
            leeway_seconds: 0,
        }));
        RealtimeEngine::new(
            RealtimeConfig::default(),
            decoder,
            Arc::new(MemoryUserDirectory::new()),
        )
    }

    #[tokio::test]
    async fn test_not_initialized_before_start() {
        let engine = engine();
        let err = engine.connect(Some("token")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotInitialized);
        let err = engine
            .publish(&Topic::User(UserId::new()), "order:notification", &())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotInitialized);
    }

    #[tokio::test]
    async fn test_shutdown_closes_sessions_and_refuses_work() {
        let engine = engine();
        engine.start();
        let session = engine
            .connections()
            .register(crate::connection::SessionIdentity {
                user_id: UserId::new(),
                role: None,
            })
            .unwrap();

        engine.shutdown();
        assert!(!session.handle.is_alive());
        assert_eq!(engine.connections().connection_count(), 0);
        assert!(engine.publish(&Topic::Admin, "x", &()).is_err());
    }
}

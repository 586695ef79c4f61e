//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use orderpulse_api::{AppState, build_app};
use orderpulse_auth::{Claims, JwtEncoder};
use orderpulse_core::config::{
    AppConfig, AuthConfig, LoggingConfig, NotificationsConfig, RealtimeConfig, ServerConfig,
    StorageBackend,
};
use orderpulse_core::types::{OrderId, UserId};
use orderpulse_database::{MemoryNotificationRepository, MemoryUserDirectory};
use orderpulse_entity::notification::NotificationContext;
use orderpulse_entity::user::{User, UserRole};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";

/// Test application context over the in-memory backend
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Wired application state
    pub state: AppState,
    /// User directory backing role lookups and staff fan-out
    pub users: Arc<MemoryUserDirectory>,
    encoder: JwtEncoder,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        storage_backend: StorageBackend::Memory,
        database: None,
        auth: AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            leeway_seconds: 0,
        },
        realtime: RealtimeConfig::default(),
        notifications: NotificationsConfig {
            cleanup_enabled: false,
            ..NotificationsConfig::default()
        },
        logging: LoggingConfig::default(),
    }
}

impl TestApp {
    /// Create a started application
    pub fn new() -> Self {
        let config = test_config();
        let encoder = JwtEncoder::new(&config.auth);
        let users = Arc::new(MemoryUserDirectory::new());
        let state = AppState::new(
            config,
            Arc::new(MemoryNotificationRepository::new()),
            users.clone(),
            None,
        );
        state.realtime.start();
        let router = build_app(state.clone());

        Self {
            router,
            state,
            users,
            encoder,
        }
    }

    /// Registers a user and returns its id with a one-hour token.
    pub fn user(&self, role: UserRole) -> (UserId, String) {
        let user = User::new("Test", role.as_str(), Some(role));
        let id = user.id;
        self.users.upsert(user);
        (id, self.token(id, Some(role)))
    }

    /// Signs a one-hour token.
    pub fn token(&self, user_id: UserId, role: Option<UserRole>) -> String {
        self.encoder
            .issue(user_id, role, chrono::Duration::hours(1))
            .expect("sign token")
    }

    /// Signs a token that expired two minutes ago.
    pub fn expired_token(&self, user_id: UserId) -> String {
        self.encoder
            .issue(user_id, Some(UserRole::Customer), chrono::Duration::minutes(-2))
            .expect("sign token")
    }

    /// Signs caller-supplied claims.
    pub fn signed(&self, claims: &Claims) -> String {
        self.encoder.encode(claims).expect("sign token")
    }

    /// Records a notification for `recipient` directly through the store.
    pub async fn seed(&self, recipient: UserId, title: &str) -> String {
        let notification = self
            .state
            .store
            .create(
                recipient,
                title,
                "Your order has been confirmed and is being prepared",
                NotificationContext::OrderStatusChanged {
                    order_id: OrderId::new(),
                    old_status: "pending".into(),
                    new_status: "confirmed".into(),
                },
            )
            .await
            .expect("seed notification");
        notification.id.to_string()
    }

    /// Make a request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

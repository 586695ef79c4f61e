//! Route definitions for the OrderPulse HTTP API.
//!
//! REST routes are mounted under `/api`; the realtime upgrade lives at
//! `/ws`. The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch},
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api_routes = Router::new()
        .merge(notification_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Caller-scoped notification read side
fn notification_routes() -> Router<AppState> {
    use handlers::notification as n;

    Router::new()
        .route("/notifications", get(n::list_notifications))
        .route("/notifications/unread-count", get(n::unread_count))
        .route("/notifications/mark-many-read", patch(n::mark_many_read))
        .route("/notifications/mark-all-read", patch(n::mark_all_read))
        .route("/notifications/read/all", delete(n::delete_all_read))
        .route("/notifications/stats", get(n::stats))
        .route("/notifications/cleanup", delete(n::cleanup))
        .route("/notifications/{id}/read", patch(n::mark_read))
        .route("/notifications/{id}", delete(n::delete_notification))
}

/// Liveness and readiness
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

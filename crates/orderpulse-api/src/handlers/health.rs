//! Health check handlers.

use axum::Json;
use axum::extract::State;

use orderpulse_core::types::ApiResponse;
use orderpulse_realtime::Topic;

use crate::dto::response::{DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let status = if state.realtime.is_running() {
        "ok"
    } else {
        "starting"
    };
    Json(ApiResponse::data(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let storage = match &state.database {
        None => "memory".to_string(),
        Some(db) => match db.health_check().await {
            Ok(true) => "postgres: connected".to_string(),
            Ok(false) => "postgres: degraded".to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                "postgres: unavailable".to_string()
            }
        },
    };
    let degraded = storage.ends_with("unavailable") || !state.realtime.is_running();

    let connections = state.realtime.connections();
    Json(ApiResponse::data(DetailedHealthResponse {
        status: if degraded { "degraded" } else { "ok" }.to_string(),
        storage,
        realtime_running: state.realtime.is_running(),
        sessions: connections.connection_count(),
        online_users: connections.user_count(),
        topics: state.realtime.channels().topic_count(),
        staff_sessions: state.realtime.channels().member_count(&Topic::Admin),
        metrics: state.realtime.metrics().snapshot(),
    }))
}

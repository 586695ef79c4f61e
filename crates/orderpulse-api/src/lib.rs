//! # orderpulse-api
//!
//! HTTP API layer for OrderPulse built on Axum.
//!
//! Provides the caller-scoped notification read side, health endpoints, the
//! realtime WebSocket upgrade, middleware (CORS, body limits, request
//! logging), the bearer extractor, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;

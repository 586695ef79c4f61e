//! Access log middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info, warn};

/// One line per request. Health checks log at debug, server errors at warn.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), elapsed_ms, "Request failed");
    } else if path.starts_with("/api/health") {
        debug!(%method, %path, status = status.as_u16(), elapsed_ms, "Health check");
    } else {
        info!(%method, %path, status = status.as_u16(), elapsed_ms, "Request served");
    }

    response
}

//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use orderpulse_core::error::{AppError, ErrorKind};
use orderpulse_core::types::ApiErrorResponse;

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Authentication | ErrorKind::InvalidCredential => StatusCode::UNAUTHORIZED,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::StorageUnavailable | ErrorKind::NotInitialized => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        let message = if status.is_server_error() {
            tracing::error!(kind = %err.kind, error = %err.message, "Request failed");
            match err.kind {
                ErrorKind::StorageUnavailable | ErrorKind::NotInitialized => err.message,
                _ => "Internal server error".to_string(),
            }
        } else {
            err.message
        };

        (status, Json(ApiErrorResponse::new(err.kind.to_string(), message))).into_response()
    }
}

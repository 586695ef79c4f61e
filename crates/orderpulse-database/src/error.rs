//! Mapping of `sqlx` errors into [`AppError`].

use orderpulse_core::error::{AppError, ErrorKind};

/// Map a `sqlx` error, classifying connectivity failures as
/// `StorageUnavailable` and everything else as `Database`.
pub fn map_sqlx(context: &str, err: sqlx::Error) -> AppError {
    let kind = match &err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => ErrorKind::StorageUnavailable,
        _ => ErrorKind::Database,
    };
    AppError::with_source(kind, format!("{context}: {err}"), err)
}

//! Inbound frame validation.

use orderpulse_core::error::AppError;

/// Validates a raw inbound frame against the configured size limit.
pub fn validate_inbound(raw: &str, max_bytes: usize) -> Result<(), AppError> {
    if raw.len() > max_bytes {
        return Err(AppError::invalid_argument(format!(
            "Message exceeds maximum size of {max_bytes} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::invalid_argument("Empty message"));
    }

    Ok(())
}

//! JWT token creation.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use orderpulse_core::config::AuthConfig;
use orderpulse_core::error::AppError;
use orderpulse_core::types::UserId;
use orderpulse_entity::user::UserRole;

use super::claims::Claims;

/// Creates signed bearer tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Issues a token for `user_id` valid for `ttl`.
    pub fn issue(
        &self,
        user_id: UserId,
        role: Option<UserRole>,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims::new(user_id, role, now.timestamp(), (now + ttl).timestamp());
        self.encode(&claims)
    }

    /// Signs arbitrary claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}

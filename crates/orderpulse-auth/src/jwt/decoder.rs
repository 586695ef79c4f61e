//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use orderpulse_core::config::AuthConfig;
use orderpulse_core::error::AppError;

use super::claims::Claims;

/// Validates bearer tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string.
    ///
    /// Every failure maps to `InvalidCredential`, including a token that
    /// names no user.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::invalid_credential("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::invalid_credential("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::invalid_credential("Invalid token signature")
                    }
                    _ => AppError::invalid_credential(format!("Token validation failed: {e}")),
                }
            })?;

        let claims = token_data.claims;
        if claims.user_id().is_none() {
            return Err(AppError::invalid_credential("Token does not identify a user"));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use chrono::Duration;
    use orderpulse_core::ErrorKind;
    use orderpulse_core::types::UserId;
    use orderpulse_entity::user::UserRole;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            leeway_seconds: 0,
        }
    }

    #[test]
    fn test_roundtrip_claims() {
        let cfg = config("a-very-long-test-secret");
        let user = UserId::new();
        let token = JwtEncoder::new(&cfg)
            .issue(user, Some(UserRole::Customer), Duration::minutes(5))
            .unwrap();
        let claims = JwtDecoder::new(&cfg).decode(&token).unwrap();
        assert_eq!(claims.user_id(), Some(user));
        assert_eq!(claims.role(), Some(UserRole::Customer));
    }

    fn sign(secret: &str, claims: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_an_hour() -> i64 {
        (chrono::Utc::now() + Duration::hours(1)).timestamp()
    }

    #[test]
    fn test_user_id_only_token_accepted() {
        let secret = "a-very-long-test-secret";
        let user = UserId::new();
        let token = sign(
            secret,
            serde_json::json!({ "userId": user, "role": "customer", "iat": 0, "exp": in_an_hour() }),
        );
        let claims = JwtDecoder::new(&config(secret)).decode(&token).unwrap();
        assert_eq!(claims.user_id(), Some(user));
        assert_eq!(claims.role(), Some(UserRole::Customer));
    }

    #[test]
    fn test_doc_id_and_user_id_token_accepted() {
        let secret = "a-very-long-test-secret";
        let user = UserId::new();
        let token = sign(
            secret,
            serde_json::json!({ "userId": user, "_id": user, "role": "admin", "iat": 0, "exp": in_an_hour() }),
        );
        let claims = JwtDecoder::new(&config(secret)).decode(&token).unwrap();
        assert_eq!(claims.user_id(), Some(user));
        assert_eq!(claims.role(), Some(UserRole::Admin));
    }

    #[test]
    fn test_token_without_user_rejected() {
        let secret = "a-very-long-test-secret";
        let token = sign(secret, serde_json::json!({ "role": "admin", "exp": in_an_hour() }));
        let err = JwtDecoder::new(&config(secret)).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
    }

    #[test]
    fn test_expired_token_rejected() {
        let cfg = config("a-very-long-test-secret");
        let token = JwtEncoder::new(&cfg)
            .issue(UserId::new(), None, Duration::minutes(-10))
            .unwrap();
        let err = JwtDecoder::new(&cfg).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtEncoder::new(&config("a-very-long-test-secret"))
            .issue(UserId::new(), None, Duration::minutes(5))
            .unwrap();
        let err = JwtDecoder::new(&config("another-long-test-secret"))
            .decode(&token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
    }

    #[test]
    fn test_garbage_rejected() {
        let err = JwtDecoder::new(&config("a-very-long-test-secret"))
            .decode("not-a-jwt")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
    }
}

//! Session identity gate: verifies the bearer credential presented at
//! handshake and resolves the caller's role.

use std::sync::Arc;

use tracing::{debug, warn};

use orderpulse_auth::JwtDecoder;
use orderpulse_core::error::AppError;
use orderpulse_core::types::UserId;
use orderpulse_database::UserDirectory;
use orderpulse_entity::user::UserRole;

use crate::metrics::EngineMetrics;

/// Identity bound to a session for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Authenticated user.
    pub user_id: UserId,
    /// Resolved role, `None` when neither the credential nor the directory
    /// could supply one.
    pub role: Option<UserRole>,
}

/// Authenticates handshakes using JWT credentials.
#[derive(Clone)]
pub struct IdentityGate {
    decoder: Arc<JwtDecoder>,
    users: Arc<dyn UserDirectory>,
    metrics: Arc<EngineMetrics>,
}

impl std::fmt::Debug for IdentityGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityGate").finish()
    }
}

impl IdentityGate {
    /// Creates a new gate.
    pub fn new(
        decoder: Arc<JwtDecoder>,
        users: Arc<dyn UserDirectory>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            decoder,
            users,
            metrics,
        }
    }

    /// Verifies a credential and resolves the role.
    ///
    /// A missing credential is an authentication error; a bad one is an
    /// invalid-credential error. A failed role lookup never rejects the
    /// caller, it only leaves the role unresolved.
    pub async fn authenticate(&self, credential: Option<&str>) -> Result<SessionIdentity, AppError> {
        let token = match credential.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => {
                self.metrics.connection_rejected();
                return Err(AppError::authentication("Authentication token required"));
            }
        };

        let claims = self
            .decoder
            .decode(token)
            .and_then(|claims| {
                claims
                    .user_id()
                    .map(|id| (id, claims))
                    .ok_or_else(|| AppError::invalid_credential("Token does not identify a user"))
            })
            .inspect_err(|e| {
                self.metrics.connection_rejected();
                debug!(error = %e, "Handshake credential rejected");
            });
        let (user_id, claims) = claims?;
        let role = match claims.role() {
            Some(role) => Some(role),
            None => self.lookup_role(user_id).await,
        };

        Ok(SessionIdentity { user_id, role })
    }

    async fn lookup_role(&self, user_id: UserId) -> Option<UserRole> {
        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) if user.role.is_some() => user.role,
            Ok(Some(_)) => {
                warn!(user_id = %user_id, "User has no role on record, admitting without role");
                self.metrics.role_lookup_degraded();
                None
            }
            Ok(None) => {
                warn!(user_id = %user_id, "User not found in directory, admitting without role");
                self.metrics.role_lookup_degraded();
                None
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Role lookup failed, admitting without role");
                self.metrics.role_lookup_degraded();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderpulse_auth::JwtEncoder;
    use orderpulse_core::config::AuthConfig;
    use orderpulse_core::error::ErrorKind;
    use orderpulse_core::result::AppResult;
    use orderpulse_database::MemoryUserDirectory;
    use orderpulse_entity::user::User;

    struct FailingDirectory;

    #[async_trait::async_trait]
    impl UserDirectory for FailingDirectory {
        async fn find_by_id(&self, _id: UserId) -> AppResult<Option<User>> {
            Err(AppError::storage_unavailable("directory down"))
        }

        async fn find_staff(&self) -> AppResult<Vec<User>> {
            Err(AppError::storage_unavailable("directory down"))
        }
    }

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "gate-test-secret-that-is-long-enough".into(),
            leeway_seconds: 0,
        }
    }

    fn gate(users: Arc<dyn UserDirectory>) -> (IdentityGate, Arc<EngineMetrics>) {
        let metrics = Arc::new(EngineMetrics::new());
        let decoder = Arc::new(JwtDecoder::new(&auth_config()));
        (IdentityGate::new(decoder, users, Arc::clone(&metrics)), metrics)
    }

    #[tokio::test]
    async fn test_missing_token_is_authentication_error() {
        let (gate, metrics) = gate(Arc::new(MemoryUserDirectory::new()));
        let err = gate.authenticate(None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        let err = gate.authenticate(Some("  ")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(metrics.snapshot().connections_rejected, 2);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (gate, _) = gate(Arc::new(MemoryUserDirectory::new()));
        let token = JwtEncoder::new(&auth_config())
            .issue(UserId::new(), Some(UserRole::Customer), chrono::Duration::seconds(-120))
            .unwrap();
        let err = gate.authenticate(Some(&token)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
    }

    #[tokio::test]
    async fn test_role_from_claims() {
        let (gate, _) = gate(Arc::new(FailingDirectory));
        let user = UserId::new();
        let token = JwtEncoder::new(&auth_config())
            .issue(user, Some(UserRole::Admin), chrono::Duration::hours(1))
            .unwrap();
        let identity = gate.authenticate(Some(&token)).await.unwrap();
        assert_eq!(identity.user_id, user);
        assert_eq!(identity.role, Some(UserRole::Admin));
    }

    #[tokio::test]
    async fn test_role_from_directory() {
        let users = Arc::new(MemoryUserDirectory::new());
        let staff = User::new("Sam", "Lee", Some(UserRole::Staff));
        let staff_id = staff.id;
        users.upsert(staff);
        let (gate, _) = gate(users);
        let token = JwtEncoder::new(&auth_config())
            .issue(staff_id, None, chrono::Duration::hours(1))
            .unwrap();
        let identity = gate.authenticate(Some(&token)).await.unwrap();
        assert_eq!(identity.role, Some(UserRole::Staff));
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades() {
        let (gate, metrics) = gate(Arc::new(FailingDirectory));
        let token = JwtEncoder::new(&auth_config())
            .issue(UserId::new(), None, chrono::Duration::hours(1))
            .unwrap();
        let identity = gate.authenticate(Some(&token)).await.unwrap();
        assert_eq!(identity.role, None);
        assert_eq!(metrics.snapshot().role_lookups_degraded, 1);
    }
}

//! `AuthUser` extractor: pulls the bearer credential from the Authorization
//! header and resolves it through the identity gate.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use orderpulse_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// The verified caller. Rejects with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let identity = state.realtime.gate().authenticate(token).await?;

        Ok(AuthUser(RequestContext::new(identity.user_id, identity.role)))
    }
}

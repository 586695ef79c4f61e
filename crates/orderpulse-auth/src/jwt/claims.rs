//! JWT claims structure carried by bearer credentials.

use serde::{Deserialize, Serialize};

use orderpulse_core::types::UserId;
use orderpulse_entity::user::UserRole;

/// JWT claims payload.
///
/// Upstream issuers identify the user as `sub`, `_id` or `userId`; older
/// tokens carry both `_id` and `userId`. Each is read independently and
/// [`Claims::user_id`] picks the first one present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<UserId>,
    /// Document-style user ID.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<UserId>,
    /// Camel-case user ID.
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Role at the time of issuance, kept raw so an unknown value does not
    /// reject the credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id` with the identity in `sub`.
    pub fn new(user_id: UserId, role: Option<UserRole>, iat: i64, exp: i64) -> Self {
        Self {
            sub: Some(user_id),
            doc_id: None,
            user_id: None,
            role: role.map(|r| r.as_str().to_string()),
            iat,
            exp,
        }
    }

    /// The identified user: `sub`, then `_id`, then `userId`.
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.or(self.doc_id).or(self.user_id)
    }

    /// The role claim, if present and recognized.
    pub fn role(&self) -> Option<UserRole> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}

//! PostgreSQL user directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use orderpulse_core::result::AppResult;
use orderpulse_core::types::UserId;
use orderpulse_entity::user::{User, UserRole};

use super::UserDirectory;
use crate::error::map_sqlx;

#[derive(Debug, FromRow)]
struct UserRow {
    id: UserId,
    first_name: String,
    last_name: String,
    role: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        // Unrecognized role strings leave the role unresolved.
        let role = row.role.as_deref().and_then(|r| r.parse::<UserRole>().ok());
        User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            role,
            created_at: row.created_at,
        }
    }
}

/// User directory backed by the PostgreSQL `users` table.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Create a new user directory.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, first_name, last_name, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to find user by id", e))?;
        Ok(row.map(User::from))
    }

    async fn find_staff(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, first_name, last_name, role, created_at FROM users \
             WHERE LOWER(role) IN ('admin', 'staff', 'userpannel') ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx("Failed to list staff users", e))?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}

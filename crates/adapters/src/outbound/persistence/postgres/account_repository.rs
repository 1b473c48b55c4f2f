//! PostgreSQL implementation for account lookups.
//!
//! The `users` and `user_roles` tables are owned by the identity
//! collaborator; this adapter only reads them.

use application::dto::AccountDto;
use application::error::{Result, ToStorage};
use application::ports::outbound::AccountRepository;
use async_trait::async_trait;
use domain::identity::{EmailAddress, UserId};
use sqlx::PgPool;

use super::models::UserRow;

/// PostgreSQL account repository.
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new [`PgAccountRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<AccountDto>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password, deleted_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .catch()?;

        Ok(row.map(AccountDto::from))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<AccountDto>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password, deleted_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .catch()?;

        Ok(row.map(AccountDto::from))
    }

    async fn roles_for(&self, id: &UserId) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT role
            FROM user_roles
            WHERE user_id = $1
            ORDER BY role
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .catch()
    }
}

//! PostgreSQL implementation of RefreshTokenRepository.
//!
//! Rotation correctness lives here: `replace` runs the revoke
//! compare-and-swap and the successor insert in one transaction, so two
//! processes presenting the same token can never both succeed.

use application::error::{ApplicationError, Result, ToStorage};
use application::ports::outbound::RefreshTokenRepository;
use async_trait::async_trait;
use domain::identity::UserId;
use domain::token::RefreshTokenRecord;
use sqlx::PgPool;

use super::models::{RefreshTokenRow, from_unix};

/// PostgreSQL refresh token repository.
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    /// Create a new [`PgRefreshTokenRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id, issued_at, expires_at, revoked, replaced_by)
            VALUES ($1, $2, $3, $4, false, NULL)
            "#,
        )
        .bind(&record.token)
        .bind(record.user_id.as_str())
        .bind(from_unix(record.issued_at))
        .bind(from_unix(record.expires_at))
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if err
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                ApplicationError::Conflict
            } else {
                ApplicationError::storage(err)
            }
        })?;

        Ok(())
    }

    async fn find(&self, digest: &str) -> Result<Option<RefreshTokenRecord>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT token, user_id, issued_at, expires_at, revoked, replaced_by
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(digest)
        .fetch_optional(&self.pool)
        .await
        .catch()?;

        match row {
            Some(row) => Ok(Some(row.try_into_record()?)),
            _ => Ok(None),
        }
    }

    async fn mark_revoked(&self, digest: &str) -> Result<()> {
        // Zero affected rows means already revoked or unknown; both are
        // fine, revocation is idempotent.
        sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = true
            WHERE token = $1 AND revoked = false
            "#,
        )
        .bind(digest)
        .execute(&self.pool)
        .await
        .catch()?;

        Ok(())
    }

    async fn replace(
        &self,
        presented: &str,
        successor: &RefreshTokenRecord,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await.catch()?;

        let swapped = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = true, replaced_by = $2
            WHERE token = $1 AND revoked = false
            "#,
        )
        .bind(presented)
        .bind(&successor.token)
        .execute(&mut *tx)
        .await
        .catch()?;

        if swapped.rows_affected() == 0 {
            tx.rollback().await.catch()?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id, issued_at, expires_at, revoked, replaced_by)
            VALUES ($1, $2, $3, $4, false, NULL)
            "#,
        )
        .bind(&successor.token)
        .bind(successor.user_id.as_str())
        .bind(from_unix(successor.issued_at))
        .bind(from_unix(successor.expires_at))
        .execute(&mut *tx)
        .await
        .catch()?;

        tx.commit().await.catch()?;

        Ok(true)
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = true
            WHERE user_id = $1 AND revoked = false
            "#,
        )
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .catch()?;

        Ok(result.rows_affected())
    }

    async fn delete_expired_before(&self, cutoff: u64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE expires_at < $1
            "#,
        )
        .bind(from_unix(cutoff))
        .execute(&self.pool)
        .await
        .catch()?;

        Ok(result.rows_affected())
    }
}

//! Row types mapping between SQL and application DTOs.

use application::dto::AccountDto;
use application::error::Result;
use chrono::{DateTime, Utc};
use domain::identity::UserId;
use domain::token::RefreshTokenRecord;

/// `refresh_tokens` table row.
#[derive(Debug, sqlx::FromRow)]
pub struct RefreshTokenRow {
    pub token: String,
    pub user_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub replaced_by: Option<String>,
}

impl RefreshTokenRow {
    pub fn try_into_record(self) -> Result<RefreshTokenRecord> {
        Ok(RefreshTokenRecord {
            token: self.token,
            user_id: UserId::parse(self.user_id)?,
            issued_at: to_unix(self.issued_at),
            expires_at: to_unix(self.expires_at),
            revoked: self.revoked,
            replaced_by: self.replaced_by,
        })
    }
}

/// `users` table row, identity collaborator's shape.
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for AccountDto {
    fn from(row: UserRow) -> Self {
        AccountDto {
            id: row.id,
            email: row.email,
            password_hash: row.password,
            deleted_at: row.deleted_at.map(to_unix),
        }
    }
}

pub(crate) fn to_unix(ts: DateTime<Utc>) -> u64 {
    ts.timestamp().max(0) as u64
}

pub(crate) fn from_unix(secs: u64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs as i64, 0)
        .expect("unix timestamp out of chrono range")
}

//! In-memory repositories.
//!
//! Same observable semantics as the PostgreSQL adapters, with the
//! compare-and-swap collapsed onto a single mutex. Used by the test
//! harness and for running the service without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use application::dto::AccountDto;
use application::error::{ApplicationError, Result};
use application::ports::outbound::{
    AccountRepository, RefreshTokenRepository,
};
use async_trait::async_trait;
use domain::identity::{EmailAddress, UserId};
use domain::token::RefreshTokenRecord;

/// In-memory refresh token repository.
#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    rows: Mutex<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, live or terminal.
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of one row, for assertions.
    pub fn get(&self, digest: &str) -> Option<RefreshTokenRecord> {
        self.rows.lock().unwrap().get(digest).cloned()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&record.token) {
            return Err(ApplicationError::Conflict);
        }

        rows.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, digest: &str) -> Result<Option<RefreshTokenRecord>> {
        Ok(self.rows.lock().unwrap().get(digest).cloned())
    }

    async fn mark_revoked(&self, digest: &str) -> Result<()> {
        if let Some(row) = self.rows.lock().unwrap().get_mut(digest) {
            row.revoked = true;
        }
        Ok(())
    }

    async fn replace(
        &self,
        presented: &str,
        successor: &RefreshTokenRecord,
    ) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();

        match rows.get_mut(presented) {
            Some(row) if !row.revoked => {
                row.revoked = true;
                row.replaced_by = Some(successor.token.clone());
            },
            _ => return Ok(false),
        }

        rows.insert(successor.token.clone(), successor.clone());
        Ok(true)
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64> {
        let mut count = 0;
        for row in self.rows.lock().unwrap().values_mut() {
            if row.user_id == *user_id && !row.revoked {
                row.revoked = true;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_expired_before(&self, cutoff: u64) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, row| row.expires_at >= cutoff);
        Ok((before - rows.len()) as u64)
    }
}

/// In-memory account repository, seeded up front.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<Vec<(AccountDto, Vec<String>)>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, account: AccountDto, roles: Vec<String>) {
        self.accounts.lock().unwrap().push((account, roles));
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<AccountDto>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(account, _)| account.id == id.as_str())
            .map(|(account, _)| account.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<AccountDto>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(account, _)| account.email == email.as_str())
            .map(|(account, _)| account.clone()))
    }

    async fn roles_for(&self, id: &UserId) -> Result<Vec<String>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(account, _)| account.id == id.as_str())
            .map(|(_, roles)| roles.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(token: &str, user: &str) -> RefreshTokenRecord {
        RefreshTokenRecord::issue(
            token,
            UserId::parse(user).unwrap(),
            1_000,
            3_600,
        )
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_digests() {
        let repo = InMemoryRefreshTokenRepository::new();
        repo.insert(&record("t1", "user-1")).await.unwrap();

        let result = repo.insert(&record("t1", "user-2")).await;
        assert!(matches!(result, Err(ApplicationError::Conflict)));
    }

    #[tokio::test]
    async fn replace_fails_on_revoked_row_without_inserting() {
        let repo = InMemoryRefreshTokenRepository::new();
        repo.insert(&record("t1", "user-1")).await.unwrap();
        repo.mark_revoked("t1").await.unwrap();

        let swapped = repo.replace("t1", &record("t2", "user-1")).await.unwrap();
        assert!(!swapped);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn replace_links_the_chain() {
        let repo = InMemoryRefreshTokenRepository::new();
        repo.insert(&record("t1", "user-1")).await.unwrap();

        let swapped = repo.replace("t1", &record("t2", "user-1")).await.unwrap();
        assert!(swapped);

        let old = repo.get("t1").unwrap();
        assert!(old.revoked);
        assert_eq!(old.replaced_by.as_deref(), Some("t2"));
        assert!(!repo.get("t2").unwrap().revoked);
    }
}

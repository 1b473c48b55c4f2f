//! Identity collaborator ports.
//!
//! Accounts are owned elsewhere; this core only reads them and verifies
//! password material through a black-box verifier.

use async_trait::async_trait;
use domain::identity::{EmailAddress, UserId};

use crate::dto::AccountDto;
use crate::error::Result;

/// Port for account/user lookups.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by user ID.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<AccountDto>>;

    /// Find an account by email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<AccountDto>>;

    /// Role names assigned to a user.
    async fn roles_for(&self, id: &UserId) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: AccountRepository + ?Sized> AccountRepository for std::sync::Arc<T> {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<AccountDto>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<AccountDto>> {
        (**self).find_by_email(email).await
    }

    async fn roles_for(&self, id: &UserId) -> Result<Vec<String>> {
        (**self).roles_for(id).await
    }
}

/// Port for password verification against a stored hash.
pub trait PasswordVerifier: Send + Sync {
    /// Verify a plaintext password against a PHC-format hash.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::InvalidCredentials`] on mismatch or on
    /// an unparsable hash — the two are indistinguishable to the caller.
    ///
    /// [`ApplicationError::InvalidCredentials`]: crate::error::ApplicationError::InvalidCredentials
    fn verify(&self, password: &str, password_hash: &str) -> Result<()>;
}

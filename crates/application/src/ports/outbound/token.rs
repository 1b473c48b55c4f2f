//! Interfaces for token operations.

use async_trait::async_trait;
use domain::identity::UserId;
use domain::token::{AccessClaims, RefreshTokenRecord};

use crate::error::Result;

/// Port for access-token signing and verification.
///
/// Implementations hold the symmetric secret, injected at construction;
/// there is no global key lookup anywhere in the core.
pub trait TokenSigner: Send + Sync {
    /// Serialize and sign a claim set into a compact token.
    fn sign(&self, claims: &AccessClaims) -> Result<String>;

    /// Decode a token, checking signature, issuer, audience and expiry.
    fn verify(&self, token: &str) -> Result<AccessClaims>;
}

impl<T: TokenSigner + ?Sized> TokenSigner for std::sync::Arc<T> {
    fn sign(&self, claims: &AccessClaims) -> Result<String> {
        (**self).sign(claims)
    }

    fn verify(&self, token: &str) -> Result<AccessClaims> {
        (**self).verify(token)
    }
}

/// Port for generating opaque token material.
pub trait TokenGenerator: Send + Sync {
    /// Generate a new refresh-token value with at least 128 bits of
    /// entropy.
    fn refresh_token(&self) -> String;

    /// Generate a short unique identifier for claim traceability (`jti`).
    fn token_id(&self) -> String;
}

/// Port for the at-rest digest of refresh tokens.
///
/// Only digests are stored; the plaintext value exists on the wire and
/// nowhere else.
pub trait TokenDigest: Send + Sync {
    fn digest(&self, token: &str) -> String;
}

/// Port for refresh token persistence.
///
/// Mutation semantics are storage-level: rotation correctness rests on
/// [`replace`] being a compare-and-swap, not on in-process locking.
///
/// [`replace`]: RefreshTokenRepository::replace
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Store a new token row.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Conflict`] if the digest already exists.
    ///
    /// [`ApplicationError::Conflict`]: crate::error::ApplicationError::Conflict
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<()>;

    /// Look up a token row by digest.
    async fn find(&self, digest: &str) -> Result<Option<RefreshTokenRecord>>;

    /// Set the revoked flag. Idempotent: revoking an already-revoked or
    /// unknown digest is a no-op, not an error.
    async fn mark_revoked(&self, digest: &str) -> Result<()>;

    /// Atomically revoke `presented` (recording `successor` as its
    /// replacement) and insert the successor row.
    ///
    /// Returns `false`, with no state change, when the presented row was
    /// not active anymore — the compare-and-swap lost.
    async fn replace(
        &self,
        presented: &str,
        successor: &RefreshTokenRecord,
    ) -> Result<bool>;

    /// Revoke every active token of a user. Returns the affected count.
    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64>;

    /// Bulk-delete rows whose expiry predates `cutoff`. Retention job
    /// only, never called from the request path.
    async fn delete_expired_before(&self, cutoff: u64) -> Result<u64>;
}

#[async_trait]
impl<T: RefreshTokenRepository + ?Sized> RefreshTokenRepository
    for std::sync::Arc<T>
{
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<()> {
        (**self).insert(record).await
    }

    async fn find(&self, digest: &str) -> Result<Option<RefreshTokenRecord>> {
        (**self).find(digest).await
    }

    async fn mark_revoked(&self, digest: &str) -> Result<()> {
        (**self).mark_revoked(digest).await
    }

    async fn replace(
        &self,
        presented: &str,
        successor: &RefreshTokenRecord,
    ) -> Result<bool> {
        (**self).replace(presented, successor).await
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64> {
        (**self).revoke_all_for_user(user_id).await
    }

    async fn delete_expired_before(&self, cutoff: u64) -> Result<u64> {
        (**self).delete_expired_before(cutoff).await
    }
}

//! Session revocation use case port.

use async_trait::async_trait;
use domain::identity::UserId;

use crate::dto::LogoutRequestDto;
use crate::error::Result;

/// Inbound port for explicit logout.
#[async_trait]
pub trait RevokeSession: Send + Sync {
    /// Invalidate one refresh token. Idempotent.
    async fn execute(&self, request: LogoutRequestDto) -> Result<()>;

    /// Invalidate every live refresh token of a user ("logout everywhere").
    /// Returns how many tokens were revoked.
    async fn revoke_all(&self, user_id: &UserId) -> Result<u64>;
}

//! Session revocation use case implementation.

use std::sync::Arc;

use async_trait::async_trait;
use domain::identity::UserId;

use crate::dto::LogoutRequestDto;
use crate::error::Result;
use crate::ports::inbound::RevokeSession;
use crate::tokens::RefreshTokenService;

/// Logout use case service.
pub struct RevokeSessionUseCase {
    refresh_tokens: Arc<RefreshTokenService>,
}

impl RevokeSessionUseCase {
    pub fn new(refresh_tokens: Arc<RefreshTokenService>) -> Self {
        Self { refresh_tokens }
    }
}

#[async_trait]
impl RevokeSession for RevokeSessionUseCase {
    async fn execute(&self, request: LogoutRequestDto) -> Result<()> {
        // Idempotent by design of the store: unknown or already-revoked
        // tokens answer the same as live ones.
        self.refresh_tokens.revoke(&request.refresh_token).await
    }

    async fn revoke_all(&self, user_id: &UserId) -> Result<u64> {
        self.refresh_tokens.revoke_all_for_user(user_id).await
    }
}

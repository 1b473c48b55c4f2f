//! Token refresh use case port.

use async_trait::async_trait;

use crate::dto::{RefreshTokenRequestDto, TokenPairDto};
use crate::error::Result;

/// Inbound port for exchanging a refresh token for a new token pair.
#[async_trait]
pub trait RefreshAccessToken: Send + Sync {
    /// Rotate the presented refresh token and mint a new access token.
    async fn execute(
        &self,
        request: RefreshTokenRequestDto,
    ) -> Result<TokenPairDto>;
}

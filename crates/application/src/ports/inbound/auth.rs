//! Authentication use case port.

use async_trait::async_trait;

use crate::dto::{LoginRequestDto, TokenPairDto};
use crate::error::Result;

/// Inbound port for password authentication.
#[async_trait]
pub trait Authenticate: Send + Sync {
    /// Verify credentials and mint an access/refresh token pair.
    async fn execute(&self, request: LoginRequestDto) -> Result<TokenPairDto>;
}

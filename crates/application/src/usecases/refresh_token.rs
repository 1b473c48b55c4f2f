//! Token refresh use case implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::dto::{RefreshTokenRequestDto, TokenPairDto};
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::RefreshAccessToken;
use crate::ports::outbound::{
    AccountRepository, Clock, TelemetryPort, TokenGenerator, TokenSigner,
};
use crate::tokens::RefreshTokenService;
use crate::usecases::{TOKEN_TYPE, build_claims};

/// Token refresh use case service.
pub struct RefreshTokenUseCase {
    account_repo: Box<dyn AccountRepository>,
    token_signer: Box<dyn TokenSigner>,
    generator: Box<dyn TokenGenerator>,
    refresh_tokens: Arc<RefreshTokenService>,
    telemetry: Box<dyn TelemetryPort>,
    clock: Box<dyn Clock>,
    access_ttl: u64,
}

impl RefreshTokenUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_repo: Box<dyn AccountRepository>,
        token_signer: Box<dyn TokenSigner>,
        generator: Box<dyn TokenGenerator>,
        refresh_tokens: Arc<RefreshTokenService>,
        telemetry: Box<dyn TelemetryPort>,
        clock: Box<dyn Clock>,
        access_ttl: u64,
    ) -> Self {
        Self {
            account_repo,
            token_signer,
            generator,
            refresh_tokens,
            telemetry,
            clock,
            access_ttl,
        }
    }
}

#[async_trait]
impl RefreshAccessToken for RefreshTokenUseCase {
    async fn execute(
        &self,
        request: RefreshTokenRequestDto,
    ) -> Result<TokenPairDto> {
        let rotated =
            self.refresh_tokens.rotate(&request.refresh_token).await?;

        // Verify the owner still exists and is not deleted. If not, the
        // successor minted above must not stay live.
        let account = match self
            .account_repo
            .find_by_id(&rotated.record.user_id)
            .await?
        {
            Some(account) if account.deleted_at.is_none() => account,
            _ => {
                self.refresh_tokens.revoke(&rotated.plaintext).await?;
                self.telemetry.record_auth_failure("owner_gone");
                return Err(ApplicationError::InvalidRefreshToken);
            },
        };

        let roles =
            self.account_repo.roles_for(&rotated.record.user_id).await?;
        let claims = build_claims(
            &account,
            &roles,
            self.generator.token_id(),
            self.clock.now(),
            self.access_ttl,
        )?;

        let access_token = self.token_signer.sign(&claims)?;

        Ok(TokenPairDto {
            access_token,
            refresh_token: rotated.plaintext,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.access_ttl,
        })
    }
}

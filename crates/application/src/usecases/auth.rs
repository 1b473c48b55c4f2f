//! Authentication use case implementation.

use std::sync::Arc;

use async_trait::async_trait;
use domain::identity::EmailAddress;

use crate::dto::{LoginRequestDto, TokenPairDto};
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::Authenticate;
use crate::ports::outbound::{
    AccountRepository, Clock, PasswordVerifier, TelemetryPort, TokenGenerator,
    TokenSigner,
};
use crate::tokens::RefreshTokenService;
use crate::usecases::{TOKEN_TYPE, build_claims};

/// Authentication use case service.
pub struct AuthenticateUseCase {
    account_repo: Box<dyn AccountRepository>,
    password: Box<dyn PasswordVerifier>,
    token_signer: Box<dyn TokenSigner>,
    generator: Box<dyn TokenGenerator>,
    refresh_tokens: Arc<RefreshTokenService>,
    telemetry: Box<dyn TelemetryPort>,
    clock: Box<dyn Clock>,
    access_ttl: u64,
}

impl AuthenticateUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_repo: Box<dyn AccountRepository>,
        password: Box<dyn PasswordVerifier>,
        token_signer: Box<dyn TokenSigner>,
        generator: Box<dyn TokenGenerator>,
        refresh_tokens: Arc<RefreshTokenService>,
        telemetry: Box<dyn TelemetryPort>,
        clock: Box<dyn Clock>,
        access_ttl: u64,
    ) -> Self {
        Self {
            account_repo,
            password,
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
impl Authenticate for AuthenticateUseCase {
    async fn execute(&self, request: LoginRequestDto) -> Result<TokenPairDto> {
        // A malformed email cannot match an account; answer exactly like an
        // unknown one so the two cases are indistinguishable.
        let Ok(email) = EmailAddress::parse(request.email) else {
            self.telemetry.record_auth_failure("malformed_email");
            return Err(ApplicationError::InvalidCredentials);
        };

        let Some(account) = self.account_repo.find_by_email(&email).await?
        else {
            self.telemetry.record_auth_failure("unknown_user");
            return Err(ApplicationError::InvalidCredentials);
        };

        if account.deleted_at.is_some() {
            self.telemetry.record_auth_failure("account_deleted");
            return Err(ApplicationError::InvalidCredentials);
        }

        if self
            .password
            .verify(&request.password, &account.password_hash)
            .is_err()
        {
            self.telemetry.record_auth_failure("wrong_password");
            return Err(ApplicationError::InvalidCredentials);
        }

        let claims = {
            let user_id = domain::identity::UserId::parse(account.id.clone())?;
            let roles = self.account_repo.roles_for(&user_id).await?;
            build_claims(
                &account,
                &roles,
                self.generator.token_id(),
                self.clock.now(),
                self.access_ttl,
            )?
        };

        let access_token = self.token_signer.sign(&claims)?;
        let issued =
            self.refresh_tokens.issue_for(claims.subject()).await?;

        self.telemetry.record_auth_success(claims.subject().as_str());

        Ok(TokenPairDto {
            access_token,
            refresh_token: issued.plaintext,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.access_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    use domain::identity::UserId;
    use domain::token::{AccessClaims, RefreshTokenRecord};

    use super::*;
    use crate::dto::AccountDto;
    use crate::ports::outbound::{RefreshTokenRepository, TokenDigest};

    struct OneAccountRepo(AccountDto);

    #[async_trait]
    impl AccountRepository for OneAccountRepo {
        async fn find_by_id(
            &self,
            id: &UserId,
        ) -> Result<Option<AccountDto>> {
            Ok((self.0.id == id.as_str()).then(|| self.0.clone()))
        }

        async fn find_by_email(
            &self,
            email: &EmailAddress,
        ) -> Result<Option<AccountDto>> {
            Ok((self.0.email == email.as_str()).then(|| self.0.clone()))
        }

        async fn roles_for(&self, _id: &UserId) -> Result<Vec<String>> {
            Ok(vec!["User".into()])
        }
    }

    struct ExactMatchVerifier;

    impl PasswordVerifier for ExactMatchVerifier {
        fn verify(&self, password: &str, hash: &str) -> Result<()> {
            if password == hash {
                Ok(())
            } else {
                Err(ApplicationError::InvalidCredentials)
            }
        }
    }

    struct FakeSigner;

    impl TokenSigner for FakeSigner {
        fn sign(&self, claims: &AccessClaims) -> Result<String> {
            Ok(format!("jwt-for-{}", claims.subject()))
        }

        fn verify(&self, _token: &str) -> Result<AccessClaims> {
            Err(ApplicationError::InvalidCredentials)
        }
    }

    struct SeqGenerator(AtomicU64);

    impl TokenGenerator for SeqGenerator {
        fn refresh_token(&self) -> String {
            format!("refresh-{}", self.0.fetch_add(1, Ordering::SeqCst))
        }

        fn token_id(&self) -> String {
            format!("jti-{}", self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    struct PlainDigest;

    impl TokenDigest for PlainDigest {
        fn digest(&self, token: &str) -> String {
            format!("digest:{token}")
        }
    }

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now(&self) -> u64 {
            self.0
        }
    }

    struct NullTelemetry;

    impl TelemetryPort for NullTelemetry {
        fn record_auth_success(&self, _user_id: &str) {}
        fn record_auth_failure(&self, _reason: &str) {}
        fn record_token_rotated(&self, _user_id: &str) {}
        fn record_replay_detected(&self, _user_id: &str) {}
        fn record_sessions_revoked(&self, _user_id: &str, _count: u64) {}
    }

    #[derive(Default)]
    struct CountingRepo {
        rows: Mutex<HashMap<String, RefreshTokenRecord>>,
    }

    #[async_trait]
    impl RefreshTokenRepository for std::sync::Arc<CountingRepo> {
        async fn insert(&self, record: &RefreshTokenRecord) -> Result<()> {
            self.rows
                .lock()
                .unwrap()
                .insert(record.token.clone(), record.clone());
            Ok(())
        }

        async fn find(
            &self,
            digest: &str,
        ) -> Result<Option<RefreshTokenRecord>> {
            Ok(self.rows.lock().unwrap().get(digest).cloned())
        }

        async fn mark_revoked(&self, _digest: &str) -> Result<()> {
            Ok(())
        }

        async fn replace(
            &self,
            _presented: &str,
            _successor: &RefreshTokenRecord,
        ) -> Result<bool> {
            Ok(false)
        }

        async fn revoke_all_for_user(
            &self,
            _user_id: &UserId,
        ) -> Result<u64> {
            Ok(0)
        }

        async fn delete_expired_before(&self, _cutoff: u64) -> Result<u64> {
            Ok(0)
        }
    }

    fn usecase(
        repo: std::sync::Arc<CountingRepo>,
    ) -> AuthenticateUseCase {
        let account = AccountDto {
            id: "listener01".into(),
            email: "listener@example.com".into(),
            password_hash: "s3cret-hash".into(),
            deleted_at: None,
        };

        let service = RefreshTokenService::new(
            Box::new(repo),
            Box::new(SeqGenerator(AtomicU64::new(0))),
            Box::new(PlainDigest),
            Box::new(FixedClock(1_000)),
            Box::new(NullTelemetry),
            3_600,
        );

        AuthenticateUseCase::new(
            Box::new(OneAccountRepo(account)),
            Box::new(ExactMatchVerifier),
            Box::new(FakeSigner),
            Box::new(SeqGenerator(AtomicU64::new(100))),
            Arc::new(service),
            Box::new(NullTelemetry),
            Box::new(FixedClock(1_000)),
            900,
        )
    }

    #[tokio::test]
    async fn login_returns_a_pair_and_stores_one_row() {
        let repo = std::sync::Arc::new(CountingRepo::default());
        let usecase = usecase(std::sync::Arc::clone(&repo));

        let pair = usecase
            .execute(LoginRequestDto {
                email: "listener@example.com".into(),
                password: "s3cret-hash".into(),
            })
            .await
            .unwrap();

        assert_eq!(pair.access_token, "jwt-for-listener01");
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);
        assert_eq!(repo.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn wrong_password_leaves_no_side_effect() {
        let repo = std::sync::Arc::new(CountingRepo::default());
        let usecase = usecase(std::sync::Arc::clone(&repo));

        let result = usecase
            .execute(LoginRequestDto {
                email: "listener@example.com".into(),
                password: "nope".into(),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::InvalidCredentials)));
        assert!(repo.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_are_indistinguishable() {
        let repo = std::sync::Arc::new(CountingRepo::default());
        let usecase = usecase(repo);

        let unknown = usecase
            .execute(LoginRequestDto {
                email: "ghost@example.com".into(),
                password: "whatever".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(unknown.to_string(), "invalid credentials");
    }
}

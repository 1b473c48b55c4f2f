//! Refresh-token life-cycle service.
//!
//! Owns issuance, validation, rotation and revocation of refresh tokens.
//! Rotation is linearizable per token value: the storage compare-and-swap
//! in [`RefreshTokenRepository::replace`] decides the single winner, so the
//! guarantee holds across processes, not just within one.

use domain::identity::UserId;
use domain::token::{RefreshTokenRecord, TokenState};

use crate::error::{ApplicationError, Result};
use crate::ports::outbound::{
    Clock, RefreshTokenRepository, TelemetryPort, TokenDigest, TokenGenerator,
};

/// What to do when an already-rotated token is presented again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReusePolicy {
    /// Reject the request and record the replay. Default.
    #[default]
    Reject,
    /// Hardened: additionally revoke every live token of the owning user,
    /// on the assumption the whole session chain is compromised.
    RevokeAll,
}

/// A freshly issued refresh token: the plaintext for the wire and the
/// stored record.
#[derive(Debug)]
pub struct IssuedRefreshToken {
    pub plaintext: String,
    pub record: RefreshTokenRecord,
}

/// Result of a successful rotation.
#[derive(Debug)]
pub struct RotatedRefreshToken {
    /// New plaintext token for the caller.
    pub plaintext: String,
    /// The successor row.
    pub record: RefreshTokenRecord,
    /// Digest of the token that was just revoked.
    pub previous: String,
}

/// Refresh token life-cycle service.
pub struct RefreshTokenService {
    repo: Box<dyn RefreshTokenRepository>,
    generator: Box<dyn TokenGenerator>,
    digest: Box<dyn TokenDigest>,
    clock: Box<dyn Clock>,
    telemetry: Box<dyn TelemetryPort>,
    lifetime_secs: u64,
    reuse_policy: ReusePolicy,
}

impl RefreshTokenService {
    pub fn new(
        repo: Box<dyn RefreshTokenRepository>,
        generator: Box<dyn TokenGenerator>,
        digest: Box<dyn TokenDigest>,
        clock: Box<dyn Clock>,
        telemetry: Box<dyn TelemetryPort>,
        lifetime_secs: u64,
    ) -> Self {
        Self {
            repo,
            generator,
            digest,
            clock,
            telemetry,
            lifetime_secs,
            reuse_policy: ReusePolicy::default(),
        }
    }

    /// Select the replay-handling policy.
    pub fn with_reuse_policy(mut self, policy: ReusePolicy) -> Self {
        self.reuse_policy = policy;
        self
    }

    /// Generate and persist a fresh `Active` token for a user.
    pub async fn issue_for(
        &self,
        user_id: &UserId,
    ) -> Result<IssuedRefreshToken> {
        let plaintext = self.generator.refresh_token();
        let record = RefreshTokenRecord::issue(
            self.digest.digest(&plaintext),
            user_id.clone(),
            self.clock.now(),
            self.lifetime_secs,
        );

        self.repo.insert(&record).await?;

        Ok(IssuedRefreshToken { plaintext, record })
    }

    /// Pure read: resolve a presented token to its `Active` record.
    ///
    /// Absent, expired and revoked all collapse into
    /// [`ApplicationError::InvalidRefreshToken`] so callers cannot probe
    /// which one it was. Presenting a revoked token additionally triggers
    /// the configured [`ReusePolicy`].
    pub async fn validate(&self, token: &str) -> Result<RefreshTokenRecord> {
        let digest = self.digest.digest(token);
        let Some(record) = self.repo.find(&digest).await? else {
            return Err(ApplicationError::InvalidRefreshToken);
        };

        match record.state(self.clock.now()) {
            TokenState::Active => Ok(record),
            TokenState::Revoked => {
                self.on_replay(&record).await?;
                Err(ApplicationError::InvalidRefreshToken)
            },
            TokenState::Expired => Err(ApplicationError::InvalidRefreshToken),
        }
    }

    /// Exchange a valid token for a successor, revoking the presented one
    /// in the same storage transaction.
    ///
    /// Under concurrency, exactly one of N calls presenting the same token
    /// wins; the rest observe the lost compare-and-swap and report
    /// [`ApplicationError::InvalidRefreshToken`] without mutating anything.
    pub async fn rotate(&self, token: &str) -> Result<RotatedRefreshToken> {
        let presented = self.validate(token).await?;

        let plaintext = self.generator.refresh_token();
        let successor = RefreshTokenRecord::issue(
            self.digest.digest(&plaintext),
            presented.user_id.clone(),
            self.clock.now(),
            self.lifetime_secs,
        );

        if !self.repo.replace(&presented.token, &successor).await? {
            // Lost the race against a concurrent rotation of the same
            // token. Not a replay: the policy only fires on reads that
            // observe an already-terminal row.
            return Err(ApplicationError::InvalidRefreshToken);
        }

        self.telemetry.record_token_rotated(presented.user_id.as_str());

        Ok(RotatedRefreshToken {
            plaintext,
            record: successor,
            previous: presented.token,
        })
    }

    /// Explicit logout. Idempotent, regardless of expiry, and silent on
    /// unknown tokens.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        let digest = self.digest.digest(token);
        self.repo.mark_revoked(&digest).await
    }

    /// Logout everywhere: revoke every live token of a user.
    pub async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<u64> {
        let count = self.repo.revoke_all_for_user(user_id).await?;
        self.telemetry.record_sessions_revoked(user_id.as_str(), count);
        Ok(count)
    }

    /// Retention pass: drop rows expired for longer than `retention_secs`.
    /// Rows in a terminal state stay queryable until then for audit.
    pub async fn purge_expired(&self, retention_secs: u64) -> Result<u64> {
        let cutoff = self.clock.now().saturating_sub(retention_secs);
        self.repo.delete_expired_before(cutoff).await
    }

    async fn on_replay(&self, record: &RefreshTokenRecord) -> Result<()> {
        self.telemetry.record_replay_detected(record.user_id.as_str());

        if self.reuse_policy == ReusePolicy::RevokeAll {
            let count =
                self.repo.revoke_all_for_user(&record.user_id).await?;
            self.telemetry
                .record_sessions_revoked(record.user_id.as_str(), count);
        }

        Ok(())
    }
}

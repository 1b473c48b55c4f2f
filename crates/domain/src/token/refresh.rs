//! Refresh-token life cycle.
//!
//! A refresh token moves through `Active -> Revoked | Expired`. Both
//! `Revoked` and `Expired` are terminal: no transition ever leaves them.

use crate::identity::UserId;

/// Observable state of a refresh token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// May be exchanged for a new token pair.
    Active,
    /// Rotated or explicitly invalidated. Permanently dead.
    Revoked,
    /// Lifetime elapsed without use.
    Expired,
}

/// Stored refresh token row.
///
/// `token` holds the storage digest of the opaque token value, never the
/// plaintext handed to the client.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: UserId,
    pub issued_at: u64,
    pub expires_at: u64,
    pub revoked: bool,
    /// Digest of the token that superseded this one. Audit only, never an
    /// input to authorization decisions.
    pub replaced_by: Option<String>,
}

impl RefreshTokenRecord {
    /// Create a fresh `Active` record with `expires_at = issued_at + lifetime`.
    pub fn issue(
        token: impl Into<String>,
        user_id: UserId,
        issued_at: u64,
        lifetime_secs: u64,
    ) -> Self {
        Self {
            token: token.into(),
            user_id,
            issued_at,
            expires_at: issued_at + lifetime_secs,
            revoked: false,
            replaced_by: None,
        }
    }

    /// State of the token at `now`. Revocation wins over expiry.
    pub fn state(&self, now: u64) -> TokenState {
        if self.revoked {
            TokenState::Revoked
        } else if now >= self.expires_at {
            TokenState::Expired
        } else {
            TokenState::Active
        }
    }

    /// A token is valid for exchange iff not revoked and not yet expired.
    /// The `expires_at` instant itself is already invalid.
    pub fn is_exchangeable(&self, now: u64) -> bool {
        self.state(now) == TokenState::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RefreshTokenRecord {
        RefreshTokenRecord::issue(
            "digest",
            UserId::parse("listener01").unwrap(),
            1_000,
            3_600,
        )
    }

    #[test]
    fn expiry_window_is_half_open() {
        let token = record();
        assert!(token.is_exchangeable(1_000));
        assert!(token.is_exchangeable(4_599));
        // The boundary instant is already invalid.
        assert!(!token.is_exchangeable(4_600));
        assert_eq!(token.state(4_600), TokenState::Expired);
    }

    #[test]
    fn revocation_is_terminal_and_wins_over_expiry() {
        let mut token = record();
        token.revoked = true;
        assert_eq!(token.state(1_000), TokenState::Revoked);
        assert_eq!(token.state(10_000), TokenState::Revoked);
    }

    #[test]
    fn issue_computes_expiry_from_lifetime() {
        let token = record();
        assert_eq!(token.expires_at, token.issued_at + 3_600);
        assert!(!token.revoked);
        assert!(token.replaced_by.is_none());
    }
}

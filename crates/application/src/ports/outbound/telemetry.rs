//! Interface for observability.

/// Port for telemetry/observability operations.
pub trait TelemetryPort: Send + Sync {
    /// Record a successful authentication.
    fn record_auth_success(&self, user_id: &str);

    /// Record a failed authentication attempt.
    fn record_auth_failure(&self, reason: &str);

    /// Record a successful refresh-token rotation.
    fn record_token_rotated(&self, user_id: &str);

    /// Record reuse of an already-rotated token — the theft signal.
    fn record_replay_detected(&self, user_id: &str);

    /// Record explicit revocations (logout, logout-everywhere).
    fn record_sessions_revoked(&self, user_id: &str, count: u64);
}

//! Telemetry adapters - Observability implementations.

use application::ports::outbound::TelemetryPort;

/// Tracing + metrics telemetry adapter.
#[derive(Default)]
pub struct TracingTelemetry;

impl TracingTelemetry {
    /// Create a new [`TracingTelemetry`].
    pub fn new() -> Self {
        Self
    }
}

impl TelemetryPort for TracingTelemetry {
    fn record_auth_success(&self, user_id: &str) {
        tracing::info!(user_id, "authentication successful");
        metrics::counter!("auth_success_total").increment(1);
    }

    fn record_auth_failure(&self, reason: &str) {
        tracing::info!(reason, "authentication failed");
        metrics::counter!("auth_failure_total", "reason" => reason.to_owned())
            .increment(1);
    }

    fn record_token_rotated(&self, user_id: &str) {
        tracing::debug!(user_id, "refresh token rotated");
        metrics::counter!("refresh_token_rotations_total").increment(1);
    }

    fn record_replay_detected(&self, user_id: &str) {
        // Audit trail entry: a dead token came back, someone may hold a
        // stolen refresh token.
        tracing::warn!(user_id, "revoked refresh token presented again");
        metrics::counter!("refresh_token_replays_total").increment(1);
    }

    fn record_sessions_revoked(&self, user_id: &str, count: u64) {
        tracing::info!(user_id, count, "refresh tokens revoked");
        metrics::counter!("sessions_revoked_total").increment(count);
    }
}

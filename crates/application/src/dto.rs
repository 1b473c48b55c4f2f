//! Data Transfer Objects for the application layer.
//!
//! DTOs are used to transfer data between layers without exposing domain
//! entities.

/// Request DTO for authentication.
#[derive(Debug, Clone)]
pub struct LoginRequestDto {
    /// Email address.
    pub email: String,
    /// Password, plaintext from the wire.
    pub password: String,
}

/// Response DTO for every operation that mints a token pair.
#[derive(Debug, Clone)]
pub struct TokenPairDto {
    /// Access token (JWT).
    pub access_token: String,
    /// Refresh token, opaque.
    pub refresh_token: String,
    /// Token type (e.g., "Bearer").
    pub token_type: String,
    /// Access-token expiration in seconds.
    pub expires_in: u64,
}

/// Request DTO for token refresh.
#[derive(Debug, Clone)]
pub struct RefreshTokenRequestDto {
    /// The presented refresh token.
    pub refresh_token: String,
}

/// Request DTO for logout.
#[derive(Debug, Clone)]
pub struct LogoutRequestDto {
    /// The refresh token to invalidate.
    pub refresh_token: String,
}

/// DTO for account data (owned by the identity collaborator, read-only
/// here).
#[derive(Debug, Clone, Default)]
pub struct AccountDto {
    pub id: String,
    pub email: String,
    /// PHC-format password hash, verified by the [`PasswordVerifier`] port.
    ///
    /// [`PasswordVerifier`]: crate::ports::outbound::PasswordVerifier
    pub password_hash: String,
    pub deleted_at: Option<u64>,
}

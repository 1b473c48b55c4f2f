//! Secure token generation using OS RNG.

use application::ports::outbound::TokenGenerator;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// 48 alphanumeric characters, log2(62^48) ≈ 285 bits of entropy. Well
/// above the 128-bit floor required for refresh tokens.
const REFRESH_TOKEN_LENGTH: usize = 48;
const TOKEN_ID_LENGTH: usize = 12;

/// OS-based secure token generator.
pub struct OsRngTokenGenerator;

impl OsRngTokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OsRngTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenGenerator for OsRngTokenGenerator {
    fn refresh_token(&self) -> String {
        OsRng
            .sample_iter(&Alphanumeric)
            .take(REFRESH_TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }

    fn token_id(&self) -> String {
        OsRng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_ID_LENGTH)
            .map(char::from)
            .collect()
    }
}

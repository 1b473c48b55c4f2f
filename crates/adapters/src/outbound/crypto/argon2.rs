//! Argon2id password verification.
//!
//! Account management (registration, password change) lives with the
//! identity collaborator; this adapter only checks presented passwords
//! against the PHC strings it stores.

use application::error::{ApplicationError, Result};
use application::ports::outbound::PasswordVerifier;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::Argon2;
use rand::rngs::OsRng;

/// Argon2id password verifier adapter.
#[derive(Default)]
pub struct Argon2PasswordVerifier;

impl Argon2PasswordVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Hash a password into a PHC string. Used by seeding tools and tests;
    /// the request path never hashes.
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| ApplicationError::InvalidCredentials)?;

        Ok(hash.to_string())
    }
}

impl PasswordVerifier for Argon2PasswordVerifier {
    fn verify(&self, password: &str, password_hash: &str) -> Result<()> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|_| ApplicationError::InvalidCredentials)?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| ApplicationError::InvalidCredentials)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_roundtrip() {
        let hash = Argon2PasswordVerifier::hash_password("hunter2!").unwrap();
        let verifier = Argon2PasswordVerifier::new();

        assert!(verifier.verify("hunter2!", &hash).is_ok());
        assert!(verifier.verify("hunter3!", &hash).is_err());
    }

    #[test]
    fn test_malformed_hash_is_rejected() {
        let verifier = Argon2PasswordVerifier::new();
        assert!(verifier.verify("hunter2!", "not-a-phc-string").is_err());
    }
}

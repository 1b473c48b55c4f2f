//! Cryptographic adapters.

pub mod argon2;
pub mod random;
pub mod sha2;

pub use argon2::Argon2PasswordVerifier;
pub use random::OsRngTokenGenerator;
pub use sha2::Sha256TokenDigest;

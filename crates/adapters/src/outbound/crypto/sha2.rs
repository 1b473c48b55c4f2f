//! SHA-256 digest for refresh tokens at rest.
//!
//! Storage only ever sees digests; a database dump yields nothing that can
//! be presented back to the API.

use application::ports::outbound::TokenDigest;
use sha2::{Digest, Sha256};

/// SHA-256 token digest.
pub struct Sha256TokenDigest;

impl Sha256TokenDigest {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Sha256TokenDigest {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenDigest for Sha256TokenDigest {
    fn digest(&self, token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }
}

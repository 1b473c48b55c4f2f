//! JWT signing and verification using HS256.
//!
//! The access token is self-verifying: any holder of the shared secret can
//! check authenticity and expiry without a storage round-trip. The secret
//! is injected at construction and immutable for the process lifetime.

use application::error::{ApplicationError, Result, ToStorage};
use application::ports::outbound::TokenSigner as ImplTokenSigner;
use domain::identity::{EmailAddress, RoleName, UserId};
use domain::token::{AccessClaims, AccessClaimsBuilder};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};

/// HS256 keys shorter than this are brute-forceable; refuse to start.
const MIN_SECRET_BYTES: usize = 32;

/// Symmetric JWT signer.
pub struct HsTokenSigner {
    algorithm: Algorithm,
    issuer: String,
    audience: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl HsTokenSigner {
    /// Create a new [`HsTokenSigner`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the secret is shorter than 32
    /// bytes. This is fatal at startup, never a per-request condition.
    pub fn new(
        secret: &str,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ApplicationError::Configuration(format!(
                "signing secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }

        Ok(Self {
            algorithm: Algorithm::HS256,
            issuer: issuer.into(),
            audience: audience.into(),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: String,
    email: String,
    roles: Vec<String>,
    iss: String,
    aud: String,
    exp: u64,
    iat: u64,
    jti: String,
}

impl ImplTokenSigner for HsTokenSigner {
    fn sign(&self, claims: &AccessClaims) -> Result<String> {
        let header = Header::new(self.algorithm);

        let claims = JwtClaims {
            sub: claims.subject().to_string(),
            email: claims.email().to_string(),
            roles: claims
                .roles()
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: claims.expires_at(),
            iat: claims.issued_at(),
            jti: claims.token_id().to_owned(),
        };

        encode(&header, &claims, &self.encoding_key).catch()
    }

    fn verify(&self, token: &str) -> Result<AccessClaims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| ApplicationError::InvalidCredentials)?;
        let claims = token_data.claims;

        let mut builder = AccessClaimsBuilder::new()
            .subject(UserId::parse(claims.sub)?)
            .email(EmailAddress::parse(claims.email)?)
            .token_id(claims.jti)
            .issued_at(claims.iat)
            .expires_at(claims.exp);
        for role in claims.roles {
            builder = builder.add_role(RoleName::parse(role)?);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn now() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    fn claims(issued_at: u64, expires_at: u64) -> AccessClaims {
        AccessClaimsBuilder::new()
            .subject(UserId::parse("listener01").unwrap())
            .email(EmailAddress::parse("listener@example.com").unwrap())
            .add_role(RoleName::parse("User").unwrap())
            .add_role(RoleName::parse("Admin").unwrap())
            .token_id("jti-1")
            .issued_at(issued_at)
            .expires_at(expires_at)
            .build()
            .unwrap()
    }

    fn signer() -> HsTokenSigner {
        HsTokenSigner::new(SECRET, "encore", "api.encore.example").unwrap()
    }

    #[test]
    fn test_short_secret_is_a_configuration_error() {
        let result = HsTokenSigner::new("short", "encore", "aud");
        assert!(matches!(
            result,
            Err(ApplicationError::Configuration(_))
        ));
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let signer = signer();
        let token = signer.sign(&claims(now(), now() + 900)).unwrap();

        let decoded = signer.verify(&token).unwrap();
        assert_eq!(decoded.subject().as_str(), "listener01");
        assert_eq!(decoded.email().as_str(), "listener@example.com");
        let roles: Vec<&str> =
            decoded.roles().iter().map(RoleName::as_str).collect();
        assert_eq!(roles, vec!["Admin", "User"]);
        assert_eq!(decoded.token_id(), "jti-1");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let signer = signer();
        let token = signer.sign(&claims(now() - 900, now() - 10)).unwrap();

        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let signer = signer();
        let mut token = signer.sign(&claims(now(), now() + 900)).unwrap();
        token.pop();
        token.push('A');

        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn test_audience_and_issuer_are_checked() {
        let token = signer().sign(&claims(now(), now() + 900)).unwrap();

        let other_audience =
            HsTokenSigner::new(SECRET, "encore", "elsewhere").unwrap();
        assert!(other_audience.verify(&token).is_err());

        let other_issuer =
            HsTokenSigner::new(SECRET, "impostor", "api.encore.example")
                .unwrap();
        assert!(other_issuer.verify(&token).is_err());
    }
}

//! Access-token claim set.
//!
//! A claim set is the result of a successful authentication: the facts the
//! issuer is willing to assert about the caller for one short-lived token.

use crate::error::{DomainError, Result};
use crate::identity::{EmailAddress, RoleName, UserId};

/// Canonical, ordered claim set embedded into an access token.
///
/// Roles are deduplicated and sorted so that two claim sets built from the
/// same facts are identical regardless of input order.
#[derive(Debug, Clone)]
pub struct AccessClaims {
    subject: UserId,
    email: EmailAddress,
    roles: Vec<RoleName>,
    token_id: String,
    issued_at: u64,
    expires_at: u64,
}

impl AccessClaims {
    pub fn subject(&self) -> &UserId {
        &self.subject
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Distinct roles, ascending lexicographic order.
    pub fn roles(&self) -> &[RoleName] {
        &self.roles
    }

    /// Unique identifier of this claim set, for traceability.
    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    pub fn issued_at(&self) -> u64 {
        self.issued_at
    }

    pub fn expires_at(&self) -> u64 {
        self.expires_at
    }
}

/// Builder for creating claim sets step by step.
#[derive(Debug, Default)]
pub struct AccessClaimsBuilder {
    subject: Option<UserId>,
    email: Option<EmailAddress>,
    roles: Vec<RoleName>,
    token_id: Option<String>,
    issued_at: Option<u64>,
    expires_at: Option<u64>,
}

impl AccessClaimsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: UserId) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn email(mut self, email: EmailAddress) -> Self {
        self.email = Some(email);
        self
    }

    pub fn add_role(mut self, role: RoleName) -> Self {
        self.roles.push(role);
        self
    }

    pub fn add_roles(mut self, roles: impl IntoIterator<Item = RoleName>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self
    }

    pub fn issued_at(mut self, timestamp: u64) -> Self {
        self.issued_at = Some(timestamp);
        self
    }

    pub fn expires_at(mut self, timestamp: u64) -> Self {
        self.expires_at = Some(timestamp);
        self
    }

    /// Build the claim set, canonicalizing roles.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the subject or token id is missing, when the
    /// email is absent, or when expiry is not strictly after issuance.
    pub fn build(mut self) -> Result<AccessClaims> {
        let subject = self.subject.ok_or(DomainError::MissingSubject)?;
        let email = self.email.ok_or(DomainError::ValidationFailed {
            field: "email".into(),
            message: "email is required".into(),
        })?;

        let token_id = match self.token_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err(DomainError::MissingTokenId),
        };

        let issued_at =
            self.issued_at.ok_or(DomainError::ValidationFailed {
                field: "issued_at".into(),
                message: "issued_at is required".into(),
            })?;
        let expires_at =
            self.expires_at.ok_or(DomainError::ValidationFailed {
                field: "expires_at".into(),
                message: "expires_at is required".into(),
            })?;

        if expires_at <= issued_at {
            return Err(DomainError::InvalidExpiry);
        }

        self.roles.sort();
        self.roles.dedup();

        Ok(AccessClaims {
            subject,
            email,
            roles: self.roles,
            token_id,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> AccessClaimsBuilder {
        AccessClaimsBuilder::new()
            .subject(UserId::parse("listener01").unwrap())
            .email(EmailAddress::parse("listener@example.com").unwrap())
            .token_id("jti-1")
            .issued_at(1_700_000_000)
            .expires_at(1_700_000_900)
    }

    #[test]
    fn roles_are_sorted_and_deduplicated() {
        let claims = builder()
            .add_role(RoleName::parse("User").unwrap())
            .add_role(RoleName::parse("Admin").unwrap())
            .add_role(RoleName::parse("User").unwrap())
            .build()
            .unwrap();

        let roles: Vec<&str> =
            claims.roles().iter().map(RoleName::as_str).collect();
        assert_eq!(roles, vec!["Admin", "User"]);
    }

    #[test]
    fn deterministic_given_same_inputs() {
        let a = builder()
            .add_role(RoleName::parse("Admin").unwrap())
            .add_role(RoleName::parse("User").unwrap())
            .build()
            .unwrap();
        let b = builder()
            .add_role(RoleName::parse("User").unwrap())
            .add_role(RoleName::parse("Admin").unwrap())
            .build()
            .unwrap();

        assert_eq!(a.roles(), b.roles());
        assert_eq!(a.subject(), b.subject());
    }

    #[test]
    fn missing_subject_is_an_error() {
        let result = AccessClaimsBuilder::new()
            .email(EmailAddress::parse("listener@example.com").unwrap())
            .token_id("jti-1")
            .issued_at(0)
            .expires_at(900)
            .build();

        assert!(matches!(result, Err(DomainError::MissingSubject)));
    }

    #[test]
    fn expiry_must_follow_issuance() {
        let result = builder().expires_at(1_700_000_000).build();
        assert!(matches!(result, Err(DomainError::InvalidExpiry)));
    }

    #[test]
    fn blank_token_id_is_an_error() {
        let result = builder().token_id("  ").build();
        assert!(matches!(result, Err(DomainError::MissingTokenId)));
    }
}

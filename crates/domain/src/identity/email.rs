//! Email address logic.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::{DomainError, Result};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_+&*-]+(?:\.[a-zA-Z0-9_+&*-]+)*@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,12}$")
        .unwrap()
});

/// Value object of a syntactically valid, lowercased email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Converts a [`String`] into a valid [`EmailAddress`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not look like an email address.
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into().trim().to_lowercase();
        if !EMAIL_RE.is_match(&value) {
            return Err(DomainError::InvalidEmailFormat);
        }

        Ok(Self(value))
    }

    /// Returns the same string as a string slice `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case() {
        let email = EmailAddress::parse("Listener@Example.COM").unwrap();
        assert_eq!(email.as_str(), "listener@example.com");
    }

    #[test]
    fn rejects_garbage() {
        assert!(EmailAddress::parse("not-an-email").is_err());
        assert!(EmailAddress::parse("a@b").is_err());
    }
}

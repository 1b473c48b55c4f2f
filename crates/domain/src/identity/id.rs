//! ID logic management.

use std::fmt;

use crate::error::{DomainError, Result};

/// Value object of a valid user identifier.
///
/// Identity is owned by the account collaborator; this core only ever
/// references users by id and never mutates them.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Converts a [`String`] into a valid [`UserId`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string length is outside 3 to 64 characters or
    /// contains anything but ASCII alphanumerics, `-` and `_`.
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        let len = trimmed.len();
        if !(3..=64).contains(&len) {
            return Err(DomainError::InvalidIdFormat);
        }

        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::InvalidIdFormat);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the same string as a string slice `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_guid_style_ids() {
        assert!(UserId::parse("3f2c9b1e-0d4a-4b7e-9a55-1c2d3e4f5a6b").is_ok());
        assert!(UserId::parse("user_01").is_ok());
    }

    #[test]
    fn rejects_out_of_bounds_and_symbols() {
        assert!(UserId::parse("ab").is_err());
        assert!(UserId::parse("a".repeat(65)).is_err());
        assert!(UserId::parse("not a user").is_err());
    }
}

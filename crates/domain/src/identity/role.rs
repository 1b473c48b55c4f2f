//! Role name logic.

use std::fmt;

use crate::error::{DomainError, Result};

/// Value object of an assigned role, e.g. `Admin` or `User`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoleName(String);

impl RoleName {
    /// Converts a [`String`] into a valid [`RoleName`].
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.len() > 64 {
            return Err(DomainError::InvalidRoleName);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the same string as a string slice `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

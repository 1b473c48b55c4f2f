//! Custom error handler for domain (core).

pub type Result<T> = std::result::Result<T, DomainError>;

/// Enum representing custom domain errors.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("invalid email formatting")]
    InvalidEmailFormat,
    #[error("id must be between 3 and 64 characters length")]
    InvalidIdFormat,
    #[error("role name must be a non-empty string of at most 64 characters")]
    InvalidRoleName,

    #[error("claim set requires a non-empty subject")]
    MissingSubject,
    #[error("claim set requires a token identifier")]
    MissingTokenId,
    #[error("expiry must be strictly after issuance")]
    InvalidExpiry,

    #[error("{field}: {message}")]
    ValidationFailed { field: String, message: String },
}

//! Application-level errors.
//!
//! Every internal failure is converted to one of these kinds before it
//! reaches the endpoint layer; raw storage errors never cross this
//! boundary.

use domain::error::DomainError;

pub type Result<T> = std::result::Result<T, ApplicationError>;

/// Errors that can occur in the application layer.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Wrong password or unknown user. Deliberately carries no detail on
    /// which factor failed.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Refresh token absent, expired or already revoked. The caller cannot
    /// distinguish the three.
    #[error("invalid refresh token")]
    InvalidRefreshToken,

    /// A freshly generated token value collided with an existing row.
    #[error("token value already exists")]
    Conflict,

    /// Missing or malformed process configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transient I/O failure talking to the backing store.
    #[error("storage unavailable")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApplicationError {
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }
}

/// Extension to fold adapter errors into [`ApplicationError::Storage`].
pub trait ToStorage<T> {
    fn catch(self) -> Result<T>;
}

impl<T, E> ToStorage<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn catch(self) -> Result<T> {
        self.map_err(|e| ApplicationError::Storage(Box::new(e)))
    }
}

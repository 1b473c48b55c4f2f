//! Identity value objects.

pub mod email;
pub mod id;
pub mod role;

pub use email::EmailAddress;
pub use id::UserId;
pub use role::RoleName;

//! Token concepts: access-token claims and the refresh-token life cycle.

pub mod claims;
pub mod refresh;

pub use claims::{AccessClaims, AccessClaimsBuilder};
pub use refresh::{RefreshTokenRecord, TokenState};

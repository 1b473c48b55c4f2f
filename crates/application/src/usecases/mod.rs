//! Application services implementing business logic.

use domain::error::Result as DomainResult;
use domain::identity::{EmailAddress, RoleName, UserId};
use domain::token::{AccessClaims, AccessClaimsBuilder};

use crate::dto::AccountDto;

pub const TOKEN_TYPE: &str = "Bearer";

pub mod auth;
pub mod logout;
pub mod refresh_token;

pub use auth::*;
pub use logout::*;
pub use refresh_token::*;

/// Assemble the canonical claim set for an authenticated account.
fn build_claims(
    account: &AccountDto,
    roles: &[String],
    token_id: String,
    now: u64,
    access_ttl: u64,
) -> DomainResult<AccessClaims> {
    let mut builder = AccessClaimsBuilder::new()
        .subject(UserId::parse(account.id.clone())?)
        .email(EmailAddress::parse(account.email.clone())?)
        .token_id(token_id)
        .issued_at(now)
        .expires_at(now + access_ttl);

    for role in roles {
        builder = builder.add_role(RoleName::parse(role.clone())?);
    }

    builder.build()
}

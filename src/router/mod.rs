//! HTTP handlers: the endpoint layer over the application use cases.

pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod revoke;
pub mod status;

use application::dto::TokenPairDto;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, header};
use domain::token::AccessClaims;
use serde::Serialize;
use validator::Validate;

use crate::{AppState, ServerError};

/// JSON extractor that runs `validator` rules before the handler.
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    T: serde::de::DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let axum::Json(value) =
            axum::Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Body of every endpoint that mints a token pair.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

impl From<TokenPairDto> for TokenResponse {
    fn from(pair: TokenPairDto) -> Self {
        Self {
            token_type: pair.token_type,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
        }
    }
}

/// Verify the `Authorization: Bearer` access token and return its claims.
pub(crate) fn bearer_claims(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AccessClaims, ServerError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ServerError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ServerError::Unauthorized)?;

    state
        .verifier
        .verify(token)
        .map_err(|_| ServerError::Unauthorized)
}

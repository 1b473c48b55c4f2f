//! Get a new token pair with a refresh token.

use application::dto::RefreshTokenRequestDto;
use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::router::{TokenResponse, Valid};
use crate::{AppState, ServerError};

fn validate_grant_type(grant_type: &str) -> Result<(), ValidationError> {
    // As specified on OAuth2.0 spec, reject if grant_type is not valid.
    if grant_type != "refresh_token" {
        return Err(ValidationError::new("invalid_grant_type"));
    }

    Ok(())
}

#[derive(Debug, Validate, Deserialize)]
pub struct Body {
    #[validate(length(min = 20, max = 128))]
    refresh_token: String,
    #[validate(custom(
        function = validate_grant_type,
        message = "\"grant_type\" must be \"refresh_token\"."
    ))]
    grant_type: String,
}

pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<TokenResponse>, ServerError> {
    let pair = state
        .refresh
        .execute(RefreshTokenRequestDto {
            refresh_token: body.refresh_token,
        })
        .await?;

    Ok(Json(pair.into()))
}

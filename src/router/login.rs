//! Password login: mint the first token pair of a session.

use application::dto::LoginRequestDto;
use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use validator::Validate;

use crate::router::{TokenResponse, Valid};
use crate::{AppState, ServerError};

#[derive(Debug, Validate, Deserialize)]
pub struct Body {
    #[validate(email)]
    email: String,
    #[validate(length(min = 8, max = 255))]
    password: String,
}

pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<TokenResponse>, ServerError> {
    let pair = state
        .authenticate
        .execute(LoginRequestDto {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(Json(pair.into()))
}

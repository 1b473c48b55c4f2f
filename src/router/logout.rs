//! Explicit logout: invalidate one refresh token.

use application::dto::LogoutRequestDto;
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::router::Valid;
use crate::{AppState, ServerError};

#[derive(Debug, Validate, Deserialize)]
pub struct Body {
    #[validate(length(min = 20, max = 128))]
    refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub ok: bool,
}

/// Always answers 200: revocation is idempotent and a dead or unknown
/// token reveals nothing.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>, ServerError> {
    state
        .logout
        .execute(LogoutRequestDto {
            refresh_token: body.refresh_token,
        })
        .await?;

    Ok(Json(Response { ok: true }))
}

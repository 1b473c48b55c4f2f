//! Logout everywhere: revoke every session of the authenticated caller.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Serialize;

use crate::router::bearer_claims;
use crate::{AppState, ServerError};

#[derive(Debug, Serialize)]
pub struct Response {
    /// Number of refresh tokens invalidated.
    pub revoked: u64,
}

pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Response>, ServerError> {
    let claims = bearer_claims(&state, &headers)?;
    let revoked = state.logout.revoke_all(claims.subject()).await?;

    Ok(Json(Response { revoked }))
}

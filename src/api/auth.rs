//! Identity from the fronting proxy.
//!
//! Authentication itself happens upstream; the proxy forwards the numeric id of
//! the signed-in user in the configured header (`AUTH_HEADER`).

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::AppState;
use crate::{error::AppError, models::UserId};

/// Signed-in user. Rejects with 401 when the header is missing or malformed.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: UserId,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(&state.settings.auth_header)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<UserId>().ok())
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser { user_id })
    }
}

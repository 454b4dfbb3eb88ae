use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::error::{AuthError, UnauthenticatedReason};
use crate::state::AppState;

/// Extracts and validates the bearer token, yielding the caller's email.
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(UnauthenticatedReason::MissingHeader)?;

        // Expect "Bearer <token>"
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(UnauthenticatedReason::InvalidScheme)?;

        let email = state.auth.authenticate(token).await?;
        Ok(AuthUser(email))
    }
}

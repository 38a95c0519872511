//! Session resolution
//!
//! Sessions are opaque bearer tokens issued by the external identity
//! provider. The server is provisioned with the token-to-user table in its
//! config and rejects anything else before a handler runs, so no query is
//! ever issued on behalf of an unauthenticated caller.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::AppState;

/// The authenticated caller's user id
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized)?;

        state
            .config
            .server
            .auth
            .tokens
            .iter()
            .find(|session| session.token == token)
            .map(|session| AuthUser(session.user.clone()))
            .ok_or(ApiError::Unauthorized)
    }
}

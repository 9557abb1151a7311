//! Auth middleware: JWT access-token extractor.
//!
//! Identity travels with each request as a verifiable bearer token; there is
//! no shared mutable "current user" in the process.

use axum::http::header::AUTHORIZATION;
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::http::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extractor: authenticated user ID from a JWT access token.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser(pub Uuid);

#[axum::async_trait]
impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX));
        let token = auth
            .ok_or_else(|| AppError::Jwt("Missing or invalid Authorization header".to_string()))?;
        let user_id = state.issuer().verify_access(token)?;
        Ok(AuthUser(user_id))
    }
}

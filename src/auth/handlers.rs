//! Auth HTTP handlers: register, login, logout, token refresh.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::validate::{validate_login, validate_registration, LoginRequest, RegisterRequest};
use crate::db::{user_create, user_find_by_email, UserRow};
use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::auth::AuthUser;

/// User summary for response envelopes. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub username: String,
}

impl From<&UserRow> for UserInfo {
    fn from(row: &UserRow) -> Self {
        Self {
            id: row.id.to_string(),
            email: row.email.clone(),
            username: row.username.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RefreshPayload {
    pub refresh: Option<String>,
}

/// POST /api/register/
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let valid = validate_registration(&body, state.policy())?;
    let password_hash = state.scheme().hash(&valid.password)?;
    let user = user_create(state.db(), &valid.email, &valid.username, &password_hash).await?;
    let tokens = state.issuer().issue_pair(user.id)?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": UserInfo::from(&user),
            "tokens": tokens,
        })),
    ))
}

/// POST /api/login/
///
/// Every failure path returns the identical generic 401 body, and a missing
/// account still pays for one hash verification so timing does not differ
/// from the wrong-password case.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let valid = validate_login(&body)?;

    let user = match user_find_by_email(state.db(), &valid.email).await? {
        Some(user) => user,
        None => {
            let _ = state.scheme().verify(&valid.password, state.scheme().dummy_hash());
            return Err(AppError::InvalidCredentials);
        }
    };

    if !state.scheme().verify(&valid.password, &user.password_hash)? || !user.is_active {
        return Err(AppError::InvalidCredentials);
    }

    let tokens = state.issuer().issue_pair(user.id)?;
    Ok(Json(json!({
        "message": "Login successful",
        "user": UserInfo::from(&user),
        "tokens": tokens,
    })))
}

/// POST /api/token/refresh/
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshPayload>,
) -> Result<Json<Value>, AppError> {
    let refresh = body
        .refresh
        .ok_or_else(|| AppError::Jwt("refresh token is required".to_string()))?;
    let access = state.issuer().refresh_access(state.db(), &refresh).await?;
    Ok(Json(json!({ "access": access })))
}

/// POST /api/logout/ — authenticated; blacklists the caller's refresh token.
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<RefreshPayload>,
) -> Result<StatusCode, AppError> {
    let refresh = body
        .refresh
        .ok_or_else(|| AppError::InvalidToken("refresh token is required".to_string()))?;
    state.issuer().revoke(state.db(), &refresh).await?;
    tracing::debug!(user_id = %user_id, "refresh token revoked");
    Ok(StatusCode::RESET_CONTENT)
}

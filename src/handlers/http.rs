//! Shared application state and health probe.

use axum::{http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

use crate::auth::{PasswordPolicy, PasswordScheme, TokenIssuer};
use crate::db::DbPool;

/// Shared application state wired in main and in integration tests.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub issuer: TokenIssuer,
    pub scheme: Arc<dyn PasswordScheme>,
    pub policy: Arc<dyn PasswordPolicy>,
}

impl AppState {
    pub fn db(&self) -> &DbPool {
        &self.db
    }
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }
    pub fn scheme(&self) -> &dyn PasswordScheme {
        self.scheme.as_ref()
    }
    pub fn policy(&self) -> &dyn PasswordPolicy {
        self.policy.as_ref()
    }
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "authd" })),
    )
}

//! Minimal user-authentication backend built with Rust.
//!
//! Registration, login, logout, and token refresh against a relational user
//! table, issuing JWT access/refresh pairs with a durable refresh-token
//! blacklist.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;

use axum::routing::{get, post};
use handlers::http;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router (register, login, logout, token refresh, health).
/// Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/api/register/", post(auth::register))
        .route("/api/login/", post(auth::login))
        .route("/api/token/refresh/", post(auth::refresh))
        .route("/api/logout/", post(auth::logout))
        .route("/health", get(http::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

//! Shared auth extractors for authenticated endpoints.

pub mod auth;

pub use auth::AuthUser;

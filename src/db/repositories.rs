//! Repositories: users and the refresh-token blacklist.

use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;

// ---- Users ----

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert a new user. Uniqueness of email and username is enforced by the
/// database constraints; under concurrent identical registrations exactly one
/// insert succeeds and the other maps to `Duplicate`.
pub async fn user_create(
    pool: &DbPool,
    email: &str,
    username: &str,
    password_hash: &str,
) -> AppResult<UserRow> {
    let res = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, username, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, email, username, password_hash, is_active, created_at
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await;

    match res {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            let field = match db.constraint() {
                Some("users_username_key") => "username",
                _ => "email",
            };
            Err(AppError::Duplicate(field))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn user_find_by_email(pool: &DbPool, email: &str) -> AppResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, username, password_hash, is_active, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

// ---- Token blacklist ----

/// Record a revoked refresh token by its `jti`. Returns `false` when an entry
/// already exists, so concurrent duplicate revocations are race-safe: the
/// second caller observes already-blacklisted instead of a constraint error.
pub async fn blacklist_insert(pool: &DbPool, jti: Uuid) -> AppResult<bool> {
    let r = sqlx::query("INSERT INTO token_blacklist (jti) VALUES ($1) ON CONFLICT (jti) DO NOTHING")
        .bind(jti)
        .execute(pool)
        .await?;
    Ok(r.rows_affected() == 1)
}

pub async fn blacklist_contains(pool: &DbPool, jti: Uuid) -> AppResult<bool> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM token_blacklist WHERE jti = $1)")
            .bind(jti)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

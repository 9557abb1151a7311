//! Token issuer: access/refresh pair, verification, revocation.

use crate::db::{blacklist_contains, blacklist_insert, DbPool};
use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub jti: String, // unique token id, blacklist key for refresh tokens
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: String, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            secret,
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        }
    }

    /// Mint an access/refresh pair for a user. No store side effect.
    pub fn issue_pair(&self, user_id: Uuid) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue(user_id, TOKEN_TYPE_ACCESS, self.access_ttl)?,
            refresh: self.issue(user_id, TOKEN_TYPE_REFRESH, self.refresh_ttl)?,
        })
    }

    fn issue(&self, user_id: Uuid, token_type: &str, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Jwt(e.to_string()))
    }

    fn decode(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AppError::Jwt(e.to_string()))?;
        Ok(data.claims)
    }

    /// Verify an access token and return the user id it carries. Rejects
    /// refresh tokens presented as access tokens.
    pub fn verify_access(&self, token: &str) -> AppResult<Uuid> {
        let claims = self.decode(token)?;
        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(AppError::Jwt("Token has wrong type".to_string()));
        }
        Uuid::parse_str(&claims.sub).map_err(|e| AppError::Jwt(e.to_string()))
    }

    fn decode_refresh(&self, token: &str) -> AppResult<(Uuid, Uuid)> {
        let claims = self.decode(token)?;
        if claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(AppError::Jwt("Token has wrong type".to_string()));
        }
        let user_id = Uuid::parse_str(&claims.sub).map_err(|e| AppError::Jwt(e.to_string()))?;
        let jti = Uuid::parse_str(&claims.jti).map_err(|e| AppError::Jwt(e.to_string()))?;
        Ok((user_id, jti))
    }

    /// Blacklist a refresh token. Malformed, expired and already-blacklisted
    /// all collapse to `InvalidToken`; once revoked a token is permanently
    /// unusable. Keyed by `jti`, so concurrent revocations of different
    /// tokens never interfere.
    pub async fn revoke(&self, pool: &DbPool, token: &str) -> AppResult<()> {
        let (_, jti) = self
            .decode_refresh(token)
            .map_err(|_| AppError::InvalidToken("Invalid token".to_string()))?;
        if !blacklist_insert(pool, jti).await? {
            return Err(AppError::InvalidToken("Invalid token".to_string()));
        }
        Ok(())
    }

    /// Mint a new access token from a live refresh token.
    pub async fn refresh_access(&self, pool: &DbPool, token: &str) -> AppResult<String> {
        let (user_id, jti) = self.decode_refresh(token)?;
        if blacklist_contains(pool, jti).await? {
            return Err(AppError::Jwt("Token is blacklisted".to_string()));
        }
        self.issue(user_id, TOKEN_TYPE_ACCESS, self.access_ttl)
    }
}

//! Password hashing and strength policy, pluggable behind traits so the
//! algorithm can be swapped without touching handler logic.

use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash/verify capability. Raw passwords never cross this boundary outward.
pub trait PasswordScheme: Send + Sync {
    fn hash(&self, password: &str) -> AppResult<String>;
    fn verify(&self, password: &str, hash: &str) -> AppResult<bool>;
    /// Hash of a throwaway value. Login verifies against this when no user
    /// matches, so response timing does not reveal whether an account exists.
    fn dummy_hash(&self) -> &str;
}

/// Strength policy applied at registration. `Err` carries the user-facing
/// reason, attached to the `password` field by the validator.
pub trait PasswordPolicy: Send + Sync {
    fn check(&self, password: &str) -> Result<(), String>;
}

pub struct ArgonScheme {
    dummy_hash: String,
}

impl ArgonScheme {
    pub fn new() -> AppResult<Self> {
        let dummy_hash = argon2_hash("throwaway")?;
        Ok(Self { dummy_hash })
    }
}

impl PasswordScheme for ArgonScheme {
    fn hash(&self, password: &str) -> AppResult<String> {
        argon2_hash(password)
    }

    fn verify(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn dummy_hash(&self) -> &str {
        &self.dummy_hash
    }
}

fn argon2_hash(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
        .to_string();
    Ok(hash)
}

const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "password123", "12345678", "123456789", "1234567890",
    "qwerty123", "qwertyuiop", "iloveyou", "sunshine", "welcome1", "admin123",
    "letmein1", "football", "baseball", "dragon123", "monkey123", "abc12345",
];

/// Default policy: minimum length, not purely numeric, not a common password.
pub struct BasicPolicy {
    pub min_length: usize,
}

impl Default for BasicPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy for BasicPolicy {
    fn check(&self, password: &str) -> Result<(), String> {
        if password.chars().count() < self.min_length {
            return Err(format!(
                "Password must be at least {} characters",
                self.min_length
            ));
        }
        if password.chars().all(|c| c.is_ascii_digit()) {
            return Err("Password cannot be entirely numeric".to_string());
        }
        if COMMON_PASSWORDS.contains(&password.to_lowercase().as_str()) {
            return Err("Password is too common".to_string());
        }
        Ok(())
    }
}

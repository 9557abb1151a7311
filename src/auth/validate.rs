//! Credential validator: request shapes and field-scoped errors.
//!
//! Registration errors name the offending field so legitimate users can fix
//! their input. Login validation deliberately collapses every failure into
//! the generic credentials error: the endpoint must not reveal whether the
//! account exists, the password was too short, or the password was wrong.

use crate::auth::password::PasswordPolicy;
use crate::error::{AppError, AppResult, FieldErrors};
use serde::Deserialize;
use validator::{Validate, ValidateEmail};

const REQUIRED: &str = "This field is required";

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Username must be 1-200 characters"))]
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration payload with all checks passed and the email normalized.
#[derive(Debug)]
pub struct ValidatedRegistration {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct ValidatedLogin {
    pub email: String,
    pub password: String,
}

pub fn validate_registration(
    req: &RegisterRequest,
    policy: &dyn PasswordPolicy,
) -> AppResult<ValidatedRegistration> {
    let mut errors = FieldErrors::new();

    if req.email.is_none() {
        errors.insert("email".to_string(), REQUIRED.to_string());
    }
    if req.username.is_none() {
        errors.insert("username".to_string(), REQUIRED.to_string());
    }
    if req.password.is_none() {
        errors.insert("password".to_string(), REQUIRED.to_string());
    }
    if req.confirm_password.is_none() {
        errors.insert("confirmPassword".to_string(), REQUIRED.to_string());
    }

    if let Err(e) = req.validate() {
        for (field, field_errors) in e.field_errors() {
            if let Some(first) = field_errors.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string());
                errors.insert(field.to_string(), message);
            }
        }
    }

    if let (Some(password), Some(confirm)) = (&req.password, &req.confirm_password) {
        if password != confirm {
            errors.insert(
                "confirmPassword".to_string(),
                "Passwords do not match".to_string(),
            );
        } else if let Err(reason) = policy.check(password) {
            errors.insert("password".to_string(), reason);
        }
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(ValidatedRegistration {
        email: req.email.as_deref().unwrap_or_default().trim().to_lowercase(),
        username: req.username.clone().unwrap_or_default(),
        password: req.password.clone().unwrap_or_default(),
    })
}

/// Shape check only; credential confirmation belongs to the user store.
pub fn validate_login(req: &LoginRequest) -> AppResult<ValidatedLogin> {
    let email = req.email.as_deref().unwrap_or("");
    let password = req.password.as_deref().unwrap_or("");
    if !email.validate_email() || password.chars().count() < 8 {
        return Err(AppError::InvalidCredentials);
    }
    Ok(ValidatedLogin {
        email: email.trim().to_lowercase(),
        password: password.to_string(),
    })
}

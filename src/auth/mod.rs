//! Authentication: register, login, logout, token refresh.

mod handlers;
mod jwt;
mod password;
mod validate;

pub use handlers::{login, logout, refresh, register};
pub use jwt::{Claims, TokenIssuer, TokenPair};
pub use password::{ArgonScheme, BasicPolicy, PasswordPolicy, PasswordScheme};
pub use validate::{validate_login, validate_registration, LoginRequest, RegisterRequest};

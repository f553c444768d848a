//! Credentials: password hashing and bearer tokens

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenKeys, DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL};

/// Password hashing failure
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

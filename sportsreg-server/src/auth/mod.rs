//! Authentication: password hashing, session tokens, middleware

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{authenticate, require_admin, CurrentUser};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};

/// Auth error type
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hash error: {0}")]
    Hash(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("token expired")]
    Expired,
}

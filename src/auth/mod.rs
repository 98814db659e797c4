//! Authentication primitives
//!
//! Password hashing and bearer-token issuance/verification. The HTTP side
//! (header extraction, role guards) lives in `api::middleware`.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl From<AuthError> for crate::error::AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Hashing(msg) => crate::error::AppError::Internal(msg),
            AuthError::Token(e) => {
                tracing::debug!("Token rejected: {}", e);
                crate::error::AppError::Unauthorized("Not authorized, token failed".to_string())
            }
        }
    }
}

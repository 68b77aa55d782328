//! Error types for sportsreg-server startup and bootstrap

use thiserror::Error;

use crate::auth::AuthError;
use crate::models::ValidationError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

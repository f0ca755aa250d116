use std::fmt;

use thiserror::Error;

use crate::auth::{PasswordError, TokenError};
use crate::database::DatabaseError;

/// Why a login attempt was refused. The two causes are reported distinctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    EmailNotFound,
    IncorrectPassword,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::EmailNotFound => write!(f, "Email does not exist."),
            AuthFailure::IncorrectPassword => write!(f, "Incorrect password, try again."),
        }
    }
}

/// Failures of account, room and automation operations.
#[derive(Debug, Error)]
pub enum HomeError {
    /// Bad user input; nothing was written.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(AuthFailure),

    /// Lookup outside the caller's ownership, or a row that does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A parent row the operation depends on is missing.
    #[error("{0}")]
    Integrity(String),

    #[error("{0}")]
    HookUnavailable(String),

    #[error("Automation hook failed to start: {0}")]
    Hook(#[source] std::io::Error),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for HomeError {
    fn from(err: sqlx::Error) -> Self {
        HomeError::Database(DatabaseError::Sqlx(err))
    }
}

impl HomeError {
    pub fn validation(message: impl Into<String>) -> Self {
        HomeError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HomeError::NotFound(message.into())
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        HomeError::Integrity(message.into())
    }
}

pub type HomeResult<T> = Result<T, HomeError>;

//! Admin authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No admin has this username.
    #[error("Username doesn't exist")]
    UnknownUsername,

    /// Username exists but the password does not match.
    #[error("Incorrect password")]
    IncorrectPassword,

    /// Username is already taken.
    #[error("Sorry, this username is already in-use")]
    UsernameTaken,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

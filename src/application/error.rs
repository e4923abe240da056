use thiserror::Error;

use crate::domain::ValidationError;

/// Errors surfaced by the entry and user services. All are reported
/// synchronously to the caller; nothing is retried internally.
#[derive(Error, Debug)]
pub enum AppError {
    /// A candidate entry violated one of the business rules.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("email already registered: {0}")]
    EmailAlreadyRegistered(String),

    /// Authentication failed: no user with the given email.
    #[error("user not found")]
    UserNotFound,

    /// Authentication failed: the email is known but the password did not
    /// match. Kept distinct from `UserNotFound` so callers can tell the two
    /// apart, even if a transport flattens both into "unauthorized".
    #[error("invalid password")]
    InvalidPassword,

    #[error("database error: {0}")]
    Database(#[from] anyhow::Error),
}

//! Authentication error types.

use thiserror::Error;

use trikart_core::{CityError, EmailError};

use crate::db::RepositoryError;
use crate::services::codes::CodeError;

/// Errors that can occur during authentication operations.
///
/// Display text on the client-fault variants is sent to callers
/// verbatim; the database and hashing variants are masked at the API
/// boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field was missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Invalid email format.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Delivery city outside the serviceable area.
    #[error(transparent)]
    OutsideServiceArea(#[from] CityError),

    /// Password too weak or invalid.
    #[error("Password validation failed: {0}")]
    WeakPassword(String),

    /// Verification code missing, expired, or wrong.
    #[error(transparent)]
    Code(#[from] CodeError),

    /// Wrong password or unknown account; not distinguished further.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session token malformed, tampered with, or expired.
    #[error("Invalid or expired session token")]
    InvalidToken,

    /// Account has been blocked by an administrator.
    #[error("Your account has been blocked. Please contact support.")]
    Blocked,

    /// Email already registered.
    #[error("An account with this email already exists")]
    EmailTaken,

    /// User not found.
    #[error("User not found")]
    UserNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin user directly
//! tk-cli admin create -e admin@example.com -n "Admin Name" -p "a strong password"
//!
//! # Promote an existing user to admin
//! tk-cli admin promote -e user@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `TRIKART_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`)

use trikart_core::{City, Email, Role, UserId};
use trikart_server::db::users::{NewUser, UserRepository};
use trikart_server::db::{self, RepositoryError};
use trikart_server::services::auth;

/// Errors that can occur during admin operations.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// City outside the service area.
    #[error("Invalid city: {0}. Valid cities: Chandigarh, Mohali, Panchkula")]
    InvalidCity(String),

    /// Password too short.
    #[error("Password must be at least {0} characters")]
    WeakPassword(usize),

    /// Password hashing failed.
    #[error("Failed to hash password")]
    PasswordHash,

    /// User already exists.
    #[error("A user already exists with email: {0}")]
    UserExists(String),

    /// No user with the given email.
    #[error("No user found with email: {0}")]
    UserNotFound(String),

    /// Other repository failure.
    #[error(transparent)]
    Repository(RepositoryError),
}

/// Create a new admin user.
///
/// Validates the inputs before touching the database, hashes the password
/// with the same Argon2id path the server uses for registration, and inserts
/// the user with the admin role.
///
/// # Errors
///
/// Returns an error if validation fails, the email is already taken, or the
/// database cannot be reached.
pub async fn create_user(
    email: &str,
    name: &str,
    phone: &str,
    city: &str,
    password: &str,
) -> Result<UserId, AdminError> {
    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;
    let city = City::parse(city).map_err(|_| AdminError::InvalidCity(city.to_owned()))?;

    if password.len() < auth::MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword(auth::MIN_PASSWORD_LENGTH));
    }

    let database_url =
        super::database_url().ok_or(AdminError::MissingEnvVar("TRIKART_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Creating admin user: {email}");

    let password_hash = auth::hash_password(password).map_err(|_| AdminError::PasswordHash)?;

    let user = UserRepository::new(&pool)
        .create(NewUser {
            name,
            phone,
            email: &email,
            password_hash: &password_hash,
            city,
            role: Role::Admin,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id)
}

/// Promote an existing user to the admin role.
///
/// # Errors
///
/// Returns `AdminError::UserNotFound` if no account has this email.
pub async fn promote_user(email: &str) -> Result<UserId, AdminError> {
    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    let database_url =
        super::database_url().ok_or(AdminError::MissingEnvVar("TRIKART_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Promoting user to admin: {email}");

    let user = UserRepository::new(&pool)
        .promote_to_admin(&email)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UserNotFound(email.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!("User promoted successfully! ID: {}, Role: {}", user.id, user.role);

    Ok(user.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Validation runs before any environment or database access, so these
    // exercise the full command path without a database.

    #[tokio::test]
    async fn test_create_user_rejects_bad_email() {
        let result = create_user("not-an-email", "Name", "9800000000", "Mohali", "longenough").await;
        assert!(matches!(result, Err(AdminError::InvalidEmail(_))));
    }

    #[tokio::test]
    async fn test_create_user_rejects_unserviceable_city() {
        let result = create_user("a@b.com", "Name", "9800000000", "Delhi", "longenough").await;
        assert!(matches!(result, Err(AdminError::InvalidCity(_))));
    }

    #[tokio::test]
    async fn test_create_user_rejects_short_password() {
        let result = create_user("a@b.com", "Name", "9800000000", "Mohali", "short").await;
        assert!(matches!(result, Err(AdminError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_promote_rejects_bad_email() {
        let result = promote_user("").await;
        assert!(matches!(result, Err(AdminError::InvalidEmail(_))));
    }
}

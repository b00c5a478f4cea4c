//! Authentication service.
//!
//! Registration is gated by an emailed verification code; passwords are
//! hashed with Argon2id. Login failures are reported as a single
//! generic error so callers cannot probe which emails have accounts.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use trikart_core::{City, Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;
use crate::services::codes::CodeStore;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A registration request, as received from the client.
#[derive(Debug)]
pub struct Registration<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub city: &'a str,
    pub verification_code: &'a str,
}

/// Authentication service.
///
/// Handles registration, login, and profile reads and updates.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    codes: &'a CodeStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, codes: &'a CodeStore) -> Self {
        Self {
            users: UserRepository::new(pool),
            codes,
        }
    }

    // =========================================================================
    // Registration and Login
    // =========================================================================

    /// Register a new account.
    ///
    /// Validation runs in order: field presence, email format, password
    /// strength, city, email availability, verification code. The code
    /// is consumed only once everything before it has passed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField`, `AuthError::InvalidEmail`,
    /// `AuthError::WeakPassword`, `AuthError::OutsideServiceArea`,
    /// `AuthError::EmailTaken`, or `AuthError::Code`.
    pub async fn register(&self, registration: &Registration<'_>) -> Result<User, AuthError> {
        let name = require(registration.name, "name")?;
        let phone = require(registration.phone, "phone")?;
        let email = require(registration.email, "email")?;
        let code = require(registration.verification_code, "verification code")?;
        if registration.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let email = Email::parse(email)?;
        validate_password(registration.password)?;
        let city = City::parse(registration.city)?;

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        self.codes.verify(&email, code)?;

        let password_hash = hash_password(registration.password)?;
        let user = self
            .users
            .create(NewUser {
                name,
                phone,
                email: &email,
                password_hash: &password_hash,
                city,
                role: Role::User,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, city = %user.city, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// The blocked check runs only after the password has been verified,
    /// so a blocked response confirms nothing to someone guessing
    /// passwords.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email or password
    /// is wrong and `AuthError::Blocked` for blocked accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = require(email, "email")?;
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;
        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if user.is_blocked {
            return Err(AuthError::Blocked);
        }

        Ok(user)
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Update name, phone, or city; omitted fields keep their value.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for blank values,
    /// `AuthError::OutsideServiceArea` for an unserviceable city, and
    /// `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        name: Option<&str>,
        phone: Option<&str>,
        city: Option<&str>,
    ) -> Result<User, AuthError> {
        let name = name.map(|n| require(n, "name")).transpose()?;
        let phone = phone.map(|p| require(p, "phone")).transpose()?;
        let city = city.map(City::parse).transpose()?;

        self.users
            .update_profile(user_id, name, phone, city)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }
}

fn require<'v>(value: &'v str, field: &'static str) -> Result<&'v str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(trimmed)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// Also used by the CLI when creating admin accounts.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

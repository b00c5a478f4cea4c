//! User repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use trikart_core::{City, Email, Role, UserId};

use super::RepositoryError;
use crate::models::User;

/// Fields for inserting a user.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub city: City,
    pub role: Role,
}

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for user queries. Text columns are validated into
/// domain types on the way out.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    phone: String,
    email: String,
    city: String,
    role: String,
    is_blocked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let city = self
            .city
            .parse::<City>()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid city in database: {e}")))?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid role in database: {e}")))?;

        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            phone: self.phone,
            email,
            city,
            role,
            is_blocked: self.is_blocked,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Internal row type for the login path, carrying the password hash.
#[derive(Debug, sqlx::FromRow)]
struct AuthRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken
    /// and `RepositoryError::Database` for other failures.
    pub async fn create(&self, new_user: NewUser<'_>) -> Result<User, RepositoryError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (name, phone, email, password_hash, city, role, is_blocked, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)
             RETURNING id, name, phone, email, city, role, is_blocked, created_at, updated_at",
        )
        .bind(new_user.name)
        .bind(new_user.phone)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.city)
        .bind(new_user.role.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "An account with this email already exists".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Look up a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure or
    /// `RepositoryError::DataCorruption` if stored data fails validation.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, phone, email, city, role, is_blocked, created_at, updated_at
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure or
    /// `RepositoryError::DataCorruption` if stored data fails validation.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, phone, email, city, role, is_blocked, created_at, updated_at
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Look up a user with their password hash, for credential checks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure or
    /// `RepositoryError::DataCorruption` if stored data fails validation.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AuthRow>(
            "SELECT id, name, phone, email, city, role, is_blocked, created_at, updated_at,
                    password_hash
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| Ok((r.user.into_user()?, r.password_hash)))
            .transpose()
    }

    /// Update name, phone, or city; `None` fields keep their value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn update_profile(
        &self,
        id: UserId,
        name: Option<&str>,
        phone: Option<&str>,
        city: Option<City>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users
             SET name = COALESCE(?, name),
                 phone = COALESCE(?, phone),
                 city = COALESCE(?, city),
                 updated_at = ?
             WHERE id = ?
             RETURNING id, name, phone, email, city, role, is_blocked, created_at, updated_at",
        )
        .bind(name)
        .bind(phone)
        .bind(city)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.into_user()
    }

    /// List one page of users, oldest account first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure or
    /// `RepositoryError::DataCorruption` if stored data fails validation.
    pub async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, phone, email, city, role, is_blocked, created_at, updated_at
             FROM users ORDER BY id ASC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    /// Count all users, for pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Give a user the admin role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this email.
    pub async fn promote_to_admin(&self, email: &Email) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET role = ?, updated_at = ? WHERE email = ?
             RETURNING id, name, phone, email, city, role, is_blocked, created_at, updated_at",
        )
        .bind(Role::Admin.as_str())
        .bind(Utc::now())
        .bind(email)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.into_user()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn create_user(pool: &SqlitePool, email: &str) -> User {
        let email = Email::parse(email).unwrap();
        UserRepository::new(pool)
            .create(NewUser {
                name: "Test User",
                phone: "9800000000",
                email: &email,
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
                city: City::Mohali,
                role: Role::User,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_by_email() {
        let pool = test_pool().await;
        let created = create_user(&pool, "user@example.com").await;

        let repo = UserRepository::new(&pool);
        let fetched = repo
            .get_by_email(&Email::parse("user@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Test User");
        assert_eq!(fetched.city, City::Mohali);
        assert_eq!(fetched.role, Role::User);
        assert!(!fetched.is_blocked);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = test_pool().await;
        create_user(&pool, "dupe@example.com").await;

        let email = Email::parse("dupe@example.com").unwrap();
        let result = UserRepository::new(&pool)
            .create(NewUser {
                name: "Another",
                phone: "9800000001",
                email: &email,
                password_hash: "x",
                city: City::Chandigarh,
                role: Role::User,
            })
            .await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_duplicate_email_differing_case_is_conflict() {
        let pool = test_pool().await;
        create_user(&pool, "case@example.com").await;

        let email = Email::parse("CASE@example.com").unwrap();
        let result = UserRepository::new(&pool)
            .create(NewUser {
                name: "Another",
                phone: "9800000001",
                email: &email,
                password_hash: "x",
                city: City::Chandigarh,
                role: Role::User,
            })
            .await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_with_password_hash() {
        let pool = test_pool().await;
        create_user(&pool, "login@example.com").await;

        let (user, hash) = UserRepository::new(&pool)
            .get_with_password_hash(&Email::parse("login@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(user.email.as_str(), "login@example.com");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_get_by_email_unknown_is_none() {
        let pool = test_pool().await;
        let result = UserRepository::new(&pool)
            .get_by_email(&Email::parse("nobody@example.com").unwrap())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_profile_partial() {
        let pool = test_pool().await;
        let user = create_user(&pool, "partial@example.com").await;

        let updated = UserRepository::new(&pool)
            .update_profile(user.id, None, Some("9811111111"), Some(City::Panchkula))
            .await
            .unwrap();

        assert_eq!(updated.name, "Test User");
        assert_eq!(updated.phone, "9811111111");
        assert_eq!(updated.city, City::Panchkula);
    }

    #[tokio::test]
    async fn test_update_profile_unknown_user_is_not_found() {
        let pool = test_pool().await;
        let result = UserRepository::new(&pool)
            .update_profile(UserId::new(9999), Some("Ghost"), None, None)
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_page_walks_all_users() {
        let pool = test_pool().await;
        create_user(&pool, "one@example.com").await;
        create_user(&pool, "two@example.com").await;
        create_user(&pool, "three@example.com").await;
        let repo = UserRepository::new(&pool);

        assert_eq!(repo.count().await.unwrap(), 3);

        let first = repo.list_page(2, 0).await.unwrap();
        let second = repo.list_page(2, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(first[0].email.as_str(), "one@example.com");
        assert_eq!(second[0].email.as_str(), "three@example.com");
    }

    #[tokio::test]
    async fn test_promote_to_admin() {
        let pool = test_pool().await;
        let user = create_user(&pool, "promote@example.com").await;
        assert_eq!(user.role, Role::User);

        let promoted = UserRepository::new(&pool)
            .promote_to_admin(&Email::parse("promote@example.com").unwrap())
            .await
            .unwrap();

        assert_eq!(promoted.role, Role::Admin);
    }
}

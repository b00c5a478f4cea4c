//! Database layer: pool creation, migrations, and repositories.
//!
//! # Repositories
//!
//! - [`users::UserRepository`] - Accounts and the login credential path
//! - [`addresses::AddressRepository`] - Delivery addresses
//! - [`catalog::CatalogRepository`] - Categories and products
//! - [`cart::CartRepository`] - Cart lines
//! - [`orders::OrderRepository`] - Order reads and status updates
//! - [`admin::AdminRepository`] - Dashboard stats and paginated listings
//!
//! SQLite notes: monetary amounts are TEXT columns parsed into
//! `rust_decimal` on read, booleans are INTEGER 0/1, and timestamps are
//! RFC 3339 TEXT.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub mod addresses;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod users;

pub use addresses::AddressRepository;
pub use admin::AdminRepository;
pub use cart::CartRepository;
pub use catalog::CatalogRepository;
pub use orders::OrderRepository;
pub use users::UserRepository;

/// Embedded migrations from `crates/server/migrations/`.
///
/// The CLI runs these through `tk-cli migrate`; tests apply them to
/// in-memory databases.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database doesn't match expected invariants.
    #[error("Data corruption: {0}")]
    DataCorruption(String),

    /// Entity not found.
    #[error("Not found")]
    NotFound,

    /// Operation conflicts with existing state.
    #[error("{0}")]
    Conflict(String),
}

/// Create a connection pool for the given SQLite database.
///
/// Creates the database file if it does not exist and enables WAL mode
/// and foreign key enforcement.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is malformed or the database cannot
/// be opened.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = database_url
        .expose_secret()
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Open an in-memory database with migrations applied.
///
/// Capped at one connection because every in-memory connection is its own
/// database.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let options = "sqlite::memory:"
        .parse::<SqliteConnectOptions>()
        .expect("valid in-memory URL")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("failed to open in-memory database");

    MIGRATOR.run(&pool).await.expect("failed to run migrations");
    pool
}

//! CLI command implementations.

use secrecy::SecretString;

pub mod admin;
pub mod migrate;
pub mod seed;

/// Load the database URL from the environment.
///
/// Reads a `.env` file first when one exists. Prefers `TRIKART_DATABASE_URL`,
/// falling back to `DATABASE_URL` so plain sqlx tooling keeps working.
fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var("TRIKART_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .ok()
}

//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ServerConfig;
use crate::services::codes::CodeStore;
use crate::services::token::TokenService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers access to the database
/// pool, the token signer, and the verification code store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: SqlitePool,
    tokens: TokenService,
    codes: CodeStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: SqlitePool) -> Self {
        let tokens = TokenService::new(&config.token_secret, config.token_ttl_hours);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                codes: CodeStore::new(),
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get a reference to the verification code store.
    #[must_use]
    pub fn codes(&self) -> &CodeStore {
        &self.inner.codes
    }
}

#[cfg(test)]
impl AppState {
    /// State over a migrated in-memory database for handler tests.
    pub(crate) async fn test(expose_verification_codes: bool) -> Self {
        use secrecy::SecretString;

        let config = ServerConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().expect("valid host"),
            port: 4000,
            token_secret: SecretString::from("xK9mQ2pL7vR4tZ8wN3jF6hD1sA5gY0bE4cU7iO2e"),
            token_ttl_hours: 168,
            expose_verification_codes,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        Self::new(config, crate::db::test_pool().await)
    }
}

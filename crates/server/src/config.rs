//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//!
//! - `TRIKART_DATABASE_URL` - SQLite connection string (falls back to `DATABASE_URL`)
//! - `TRIKART_TOKEN_SECRET` - Bearer token signing secret (min 32 chars, validated for strength)
//!
//! ## Optional
//!
//! - `TRIKART_HOST` - Bind address (default: 127.0.0.1)
//! - `TRIKART_PORT` - Listen port (default: 4000)
//! - `TRIKART_TOKEN_TTL_HOURS` - Bearer token validity in hours (default: 168)
//! - `TRIKART_EXPOSE_VERIFICATION_CODES` - Return codes from send-code responses (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN (disabled when unset)
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry tracing sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Minimum length for the token signing secret.
const MIN_TOKEN_SECRET_LENGTH: usize = 32;

/// Minimum Shannon entropy (bits per character) for secrets.
/// Random base64 is ~6 bits/char, hex is 4 bits/char.
/// This threshold catches repeated characters and simple patterns.
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "change-me",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value.
    #[error("Invalid value for {0}: {1}")]
    InvalidEnvVar(String, String),

    /// A secret failed strength validation.
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
///
/// Secrets are wrapped in [`SecretString`] so they are redacted from
/// `Debug` output and never logged.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite connection string.
    pub database_url: SecretString,
    /// Address to bind the HTTP server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Signing secret for bearer tokens.
    pub token_secret: SecretString,
    /// Bearer token validity in hours.
    pub token_ttl_hours: i64,
    /// Whether send-code responses include the issued code.
    /// Only enable in development; there is no real email delivery.
    pub expose_verification_codes: bool,
    /// Sentry DSN for error tracking (None disables Sentry).
    pub sentry_dsn: Option<String>,
    /// Sentry environment name.
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0).
    pub sentry_sample_rate: f32,
    /// Sentry performance tracing sample rate (0.0 to 1.0).
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first when one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, values fail
    /// to parse, or the token secret fails strength validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("TRIKART_DATABASE_URL")?;

        let host = get_env_or_default("TRIKART_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TRIKART_HOST".to_string(), e.to_string()))?;

        let port = get_env_or_default("TRIKART_PORT", "4000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TRIKART_PORT".to_string(), e.to_string()))?;

        let token_secret = get_validated_secret("TRIKART_TOKEN_SECRET")?;

        let token_ttl_hours = get_env_or_default("TRIKART_TOKEN_TTL_HOURS", "168")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TRIKART_TOKEN_TTL_HOURS".to_string(), e.to_string())
            })?;

        let expose_verification_codes =
            get_env_or_default("TRIKART_EXPOSE_VERIFICATION_CODES", "false")
                .parse::<bool>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "TRIKART_EXPOSE_VERIFICATION_CODES".to_string(),
                        e.to_string(),
                    )
                })?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        let sentry_sample_rate = get_env_or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        let sentry_traces_sample_rate = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            database_url,
            host,
            port,
            token_secret,
            token_ttl_hours,
            expose_verification_codes,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    get_required_env(key).map(SecretString::from)
}

/// Get the database URL, preferring the given key with `DATABASE_URL` as
/// a fallback so plain sqlx tooling keeps working.
fn get_database_url(key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let len = s.len() as f64;
    let mut char_counts = std::collections::HashMap::new();

    for c in s.chars() {
        *char_counts.entry(c).or_insert(0u32) += 1;
    }

    char_counts
        .values()
        .map(|&count| {
            let p = f64::from(count) / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is strong enough for production use.
///
/// Checks minimum length, placeholder patterns, and Shannon entropy.
fn validate_secret_strength(key: &str, secret: &SecretString) -> Result<(), ConfigError> {
    let value = secret.expose_secret();

    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!(
                "must be at least {MIN_TOKEN_SECRET_LENGTH} characters (got {})",
                value.len()
            ),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                key.to_string(),
                format!("contains placeholder pattern '{pattern}'"),
            ));
        }
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need {MIN_ENTROPY_BITS_PER_CHAR}); \
                 use a randomly generated value"
            ),
        ));
    }

    Ok(())
}

/// Get a required secret and validate its strength.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let secret = get_required_secret(key)?;
    validate_secret_strength(key, &secret)?;
    Ok(secret)
}

//! In-memory verification code store.
//!
//! Codes gate registration: `issue` hands out a 6-digit code for an
//! email, `verify` consumes it. Entries live only as long as the
//! process; a restart invalidates every outstanding code.
//!
//! Issuing a new code replaces any outstanding one for that email, even
//! one mid-verification. Last write wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use trikart_core::Email;

/// Minutes a code stays valid after issue.
pub const CODE_TTL_MINUTES: i64 = 10;

/// Errors returned by code verification. Messages are client-presentable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    /// No code outstanding for this email.
    #[error("No verification code found. Please request a new one.")]
    NotFound,

    /// The code's lifetime has passed.
    #[error("Verification code has expired. Please request a new one.")]
    Expired,

    /// The submitted code does not match the issued one.
    #[error("Invalid verification code")]
    Mismatch,
}

/// Time source for expiry checks, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct CodeEntry {
    code: String,
    expires_at: DateTime<Utc>,
}

/// Verification codes keyed by email.
///
/// Keys are lowercased so a code survives case differences between the
/// send-code call and the register call.
pub struct CodeStore {
    entries: Mutex<HashMap<String, CodeEntry>>,
    clock: Arc<dyn Clock>,
}

impl CodeStore {
    /// Create a store running on wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a store with an explicit time source.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Issue a fresh code for this email, replacing any outstanding one.
    pub fn issue(&self, email: &Email) -> String {
        let code = generate_verification_code();
        let expires_at = self.clock.now() + Duration::minutes(CODE_TTL_MINUTES);

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key(email),
            CodeEntry {
                code: code.clone(),
                expires_at,
            },
        );

        code
    }

    /// Check a code and consume it on success.
    ///
    /// Expired entries are evicted on the failed attempt; a mismatched
    /// code leaves the entry in place for another try.
    ///
    /// # Errors
    ///
    /// Returns `CodeError::NotFound`, `CodeError::Expired`, or
    /// `CodeError::Mismatch`.
    pub fn verify(&self, email: &Email, code: &str) -> Result<(), CodeError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let key = key(email);

        let (expired, matches) = {
            let Some(entry) = entries.get(&key) else {
                return Err(CodeError::NotFound);
            };
            (self.clock.now() > entry.expires_at, entry.code == code)
        };

        if expired {
            entries.remove(&key);
            return Err(CodeError::Expired);
        }
        if !matches {
            return Err(CodeError::Mismatch);
        }

        entries.remove(&key);
        Ok(())
    }

    /// Drop any outstanding code for this email.
    pub fn remove(&self, email: &Email) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&key(email));
    }
}

impl Default for CodeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn key(email: &Email) -> String {
    email.as_str().to_lowercase()
}

/// Generate a 6-digit verification code.
#[must_use]
pub fn generate_verification_code() -> String {
    use rand::Rng;
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}

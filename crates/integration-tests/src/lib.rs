//! Integration tests for the Trikart API.
//!
//! Every test in `tests/` drives a running server over HTTP and is
//! `#[ignore]`d by default so `cargo test` stays hermetic.
//!
//! # Running Tests
//!
//! ```bash
//! # Terminal 1: server against a throwaway database, dev mode on
//! export TRIKART_DATABASE_URL=sqlite://integration.db
//! export TRIKART_TOKEN_SECRET=$(openssl rand -base64 32)
//! export TRIKART_EXPOSE_VERIFICATION_CODES=true
//! cargo run -p trikart-cli -- migrate
//! cargo run -p trikart-cli -- seed
//! cargo run -p trikart-server
//!
//! # Terminal 2
//! cargo test -p trikart-integration-tests -- --ignored
//! ```
//!
//! The registration helper relies on `TRIKART_EXPOSE_VERIFICATION_CODES=true`
//! so the verification code comes back in the send-code response instead of
//! going out by email.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use serde_json::{Value, json};

static SEQ: AtomicU64 = AtomicU64::new(0);

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("TRIKART_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:4000".to_string())
}

/// An email address no other test (or test run) will collide with.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos}-{seq}@test.trikart.in")
}

/// Password used for every account the test helpers create.
pub const TEST_PASSWORD: &str = "integration-pass-1";

/// Register a fresh user through the full send-code flow and return
/// `(bearer token, email)`.
///
/// # Panics
///
/// Panics if any step fails, including when the server is not running in
/// dev mode and the send-code response carries no code.
pub async fn register_user(client: &Client, prefix: &str) -> (String, String) {
    let base_url = base_url();
    let email = unique_email(prefix);

    let resp = client
        .post(format!("{base_url}/api/auth/send-code"))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Failed to request verification code");
    assert!(
        resp.status().is_success(),
        "send-code failed with {}",
        resp.status()
    );

    let body: Value = resp
        .json()
        .await
        .expect("Failed to parse send-code response");
    let code = body
        .get("code")
        .and_then(Value::as_str)
        .expect("send-code response has no code; set TRIKART_EXPOSE_VERIFICATION_CODES=true")
        .to_string();

    let resp = client
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "name": "Integration Test",
            "phone": "9810000000",
            "email": email,
            "password": TEST_PASSWORD,
            "city": "Chandigarh",
            "verificationCode": code,
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status().as_u16(), 201, "register failed");

    let body: Value = resp
        .json()
        .await
        .expect("Failed to parse register response");
    let token = body
        .get("token")
        .and_then(Value::as_str)
        .expect("register response has no token")
        .to_string();

    (token, email)
}

//! Trikart API server library.
//!
//! JSON backend for the Trikart mobile storefront. The binary in `main.rs`
//! wires this library to a listening socket; the CLI reuses the repositories,
//! migrations, and password hashing from here.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration with secret validation
//! - [`db`] - Connection pool, migrations, and repositories
//! - [`error`] - Request error type and JSON error responses
//! - [`middleware`] - Bearer-token auth extractors
//! - [`models`] - Domain types and their wire representations
//! - [`routes`] - HTTP handlers
//! - [`services`] - Business logic (auth, verification codes, tokens, orders)
//! - [`state`] - Shared application state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

//! Core types for Trikart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod city;
pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use city::{City, CityError};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Money, MoneyError};
pub use status::*;

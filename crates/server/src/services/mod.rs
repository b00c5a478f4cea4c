//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, login, and profile management
//! - `codes` - In-memory email verification codes
//! - `orders` - Order placement and status transitions
//! - `token` - JWT session tokens

pub mod auth;
pub mod codes;
pub mod orders;
pub mod token;

pub use auth::{AuthError, AuthService, Registration};
pub use codes::{CodeError, CodeStore, generate_verification_code};
pub use orders::{OrderError, OrderLine, OrderService};
pub use token::{Claims, TokenError, TokenService};

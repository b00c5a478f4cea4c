//! Domain types and their wire representations.
//!
//! Response JSON is camelCase; the structs here are the single source of
//! truth for what the API returns. Request bodies live next to their
//! handlers in [`crate::routes`].

pub mod address;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod payment;
pub mod user;

pub use address::Address;
pub use cart::{CartLine, CartLineDetail};
pub use catalog::{Category, CategoryWithProducts, Product, ProductWithCategory};
pub use order::{AdminOrder, Order, OrderItem, OrderWithItems, UserSummary};
pub use payment::Payment;
pub use user::User;

//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /api/auth/send-code      - Issue an email verification code
//! POST   /api/auth/register       - Register (requires verification code)
//! POST   /api/auth/login          - Login, returns a bearer token
//! GET    /api/auth/me             - Current user profile
//! PUT    /api/auth/profile        - Update name/phone/city
//! POST   /api/auth/logout         - Logout confirmation
//!
//! # Catalog
//! GET    /api/categories          - List categories (public)
//! GET    /api/categories/{id}     - Category with its products (public)
//! GET    /api/products            - List products, filterable
//! GET    /api/products/{id}       - Product with its category
//!
//! # Cart
//! POST   /api/cart                - Add or replace a cart line
//! GET    /api/cart                - List cart lines with live product data
//! DELETE /api/cart/{productId}    - Remove one product from the cart
//! DELETE /api/cart                - Clear the cart
//!
//! # Orders
//! POST   /api/orders              - Place an order
//! GET    /api/orders              - Caller's orders, newest first
//! GET    /api/orders/{id}         - One order (owner only)
//! PUT    /api/orders/{id}/status  - Change status (admin only)
//!
//! # Addresses
//! POST   /api/addresses           - Create a delivery address
//! GET    /api/addresses           - List the caller's addresses
//! PUT    /api/addresses/{id}      - Update an address (owner only)
//! DELETE /api/addresses/{id}      - Delete an address (owner only)
//!
//! # Admin
//! GET    /api/admin/dashboard/stats - User/order/revenue totals
//! GET    /api/admin/users           - Paginated user listing
//! GET    /api/admin/orders          - Paginated order listing
//! ```
//!
//! Everything except the auth entry points and category reads requires a
//! bearer token; admin routes additionally require the admin role.

pub mod addresses;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Body for endpoints that only confirm an action.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/send-code", post(auth::send_code))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route("/logout", post(auth::logout))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list))
        .route("/{id}", get(categories::show))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(cart::add).get(cart::list).delete(cart::clear))
        .route("/{product_id}", delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::place).get(orders::list))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", put(orders::update_status))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(addresses::create).get(addresses::list))
        .route(
            "/{id}",
            put(addresses::update).delete(addresses::delete),
        )
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(admin::stats))
        .route("/users", get(admin::list_users))
        .route("/orders", get(admin::list_orders))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/categories", category_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/addresses", address_routes())
        .nest("/api/admin", admin_routes())
}

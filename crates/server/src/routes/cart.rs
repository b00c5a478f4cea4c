//! Cart route handlers.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use trikart_core::ProductId;

use crate::db::{CartRepository, RepositoryError};
use crate::error::{AppError, Json, Path, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::{CartLine, CartLineDetail};
use crate::state::AppState;

use super::MessageResponse;

/// Request to add a product or replace its quantity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertCartRequest {
    #[serde(alias = "product_id")]
    pub product_id: ProductId,
    pub quantity: i64,
}

/// The cart as returned to clients.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLineDetail>,
}

/// Add a product to the cart, or replace its quantity if present.
///
/// # Errors
///
/// Returns 400 for a non-positive quantity, 404 for an unknown product,
/// and 409 when the quantity exceeds available stock.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Json(body): Json<UpsertCartRequest>,
) -> Result<Json<CartLine>> {
    if body.quantity < 1 {
        return Err(AppError::Validation(
            "Quantity must be at least 1".to_owned(),
        ));
    }

    add_breadcrumb(
        "cart",
        format!("add product {} x{}", body.product_id, body.quantity),
    );

    let cart = CartRepository::new(state.pool());
    let line = cart
        .upsert(claims.user_id(), body.product_id, body.quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product not found".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(line))
}

/// List the cart with live product data.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<CartResponse>> {
    let cart = CartRepository::new(state.pool());
    let items = cart.list(claims.user_id()).await?;

    Ok(Json(CartResponse { items }))
}

/// Remove one product from the cart.
///
/// # Errors
///
/// Returns 404 if the product is not in the cart.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    let cart = CartRepository::new(state.pool());
    cart.remove(claims.user_id(), product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Item not found in cart".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(MessageResponse::new("Item removed from cart")))
}

/// Remove every line from the cart.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<MessageResponse>> {
    let cart = CartRepository::new(state.pool());
    cart.clear(claims.user_id()).await?;

    Ok(Json(MessageResponse::new("Cart cleared")))
}

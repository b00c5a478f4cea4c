//! Cart types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use trikart_core::{CartLineId, Money, ProductId, UserId};

/// One cart line: a product and an absolute quantity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartLineId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with live product data.
///
/// Prices here always reflect the catalog now, not the moment the line
/// was added.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDetail {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub name: String,
    pub price: Money,
    pub image_url: Option<String>,
    pub available_stock: i64,
}

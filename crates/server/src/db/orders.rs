//! Order read side and status updates.
//!
//! Order creation lives in the order service, which owns the whole
//! placement transaction. This repository only reads orders back and
//! applies status changes already validated against the status machine.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;

use trikart_core::{OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderWithItems};

pub(crate) const ORDER_COLUMNS: &str = "id, user_id, address_id, status, payment_method, \
     subtotal, delivery_fee, tax, total, created_at, updated_at";

/// Repository for orders and their item snapshots.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's orders, newest first, items attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?
             ORDER BY created_at DESC, id DESC"
        );
        let orders = sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT i.id, i.order_id, i.product_id, i.product_name, i.unit_price, i.quantity
             FROM order_items i
             JOIN orders o ON o.id = i.order_id
             WHERE o.user_id = ?
             ORDER BY i.id ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect())
    }

    /// Fetch one order with items if it exists and belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ? AND user_id = ?");
        let Some(order) = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };

        let items = self.items_for(order.id).await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    /// Fetch one order regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(order)
    }

    /// Set an order's status.
    ///
    /// Transition validity is the caller's responsibility; this only
    /// writes the new value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let query = format!(
            "UPDATE orders SET status = ?, updated_at = ? WHERE id = ?
             RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(order)
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, product_name, unit_price, quantity
             FROM order_items WHERE order_id = ?
             ORDER BY id ASC",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}

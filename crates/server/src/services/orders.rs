//! Order placement and status transitions.
//!
//! Placement runs in one transaction: address ownership check, per-line
//! stock decrements, the order row with its item snapshots, and the cart
//! clear all commit together or not at all. Totals are recomputed
//! server-side; a client-supplied total is accepted only within a
//! one-rupee rounding tolerance.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use thiserror::Error;

use trikart_core::{AddressId, Money, OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::orders::{ORDER_COLUMNS, OrderRepository};
use crate::models::{Order, OrderItem, OrderWithItems};

/// Flat delivery surcharge applied to every order, in rupees.
pub const DELIVERY_FEE_RUPEES: u32 = 99;

/// Tax rate applied to the subtotal, in percent.
pub const TAX_RATE_PERCENT: u32 = 18;

/// Accepted gap between a client-supplied total and the recomputed one,
/// covering clients that round tax differently.
const TOTAL_TOLERANCE_RUPEES: u32 = 1;

/// Errors from order placement and status updates.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Request input failed validation.
    #[error("{0}")]
    Validation(String),

    /// The requested status change is not allowed by the status machine.
    #[error("Cannot change order status from '{from}' to '{to}'")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The delivery address does not exist or belongs to another user.
    #[error("Address not found")]
    AddressNotFound,

    /// A product in the order does not exist.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// The order does not exist.
    #[error("Order not found")]
    NotFound,

    /// Not enough stock to cover a line.
    #[error("Insufficient stock for '{name}'")]
    OutOfStock { name: String },

    /// Database operation failed.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::from(e))
    }
}

/// One line of an order request: the product, how many, and the unit
/// price the client saw. The price becomes the immutable snapshot and
/// feeds the server-side total.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

/// Order placement and status transition service.
pub struct OrderService<'a> {
    pool: &'a SqlitePool,
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            pool,
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order for the given user.
    ///
    /// When `client_total` is supplied it is checked against the
    /// recomputed total and rejected outside the tolerance, so a stale
    /// or tampering client cannot set the amount.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for an empty or malformed
    /// request, `OrderError::AddressNotFound` if the address is missing
    /// or owned by someone else, `OrderError::ProductNotFound` for
    /// unknown products, and `OrderError::OutOfStock` when a line
    /// exceeds available stock.
    pub async fn place(
        &self,
        user_id: UserId,
        lines: &[OrderLine],
        address_id: AddressId,
        payment_method: PaymentMethod,
        client_total: Option<Money>,
    ) -> Result<OrderWithItems, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::Validation(
                "Order must contain at least one item".to_owned(),
            ));
        }
        if lines.iter().any(|line| line.quantity == 0) {
            return Err(OrderError::Validation(
                "Item quantity must be at least 1".to_owned(),
            ));
        }

        let subtotal: Money = lines
            .iter()
            .map(|line| line.unit_price.times(line.quantity))
            .sum();
        let delivery_fee = Money::from_rupees(DELIVERY_FEE_RUPEES);
        let tax = subtotal.percent_rounded(Decimal::from(TAX_RATE_PERCENT));
        let total = subtotal + delivery_fee + tax;

        if let Some(client_total) = client_total
            && client_total.abs_diff(total) > Money::from_rupees(TOTAL_TOLERANCE_RUPEES)
        {
            return Err(OrderError::Validation(format!(
                "Total amount mismatch: expected {total}, got {client_total}"
            )));
        }

        let mut tx = self.pool.begin().await?;

        let address: Option<i64> =
            sqlx::query_scalar("SELECT id FROM addresses WHERE id = ? AND user_id = ?")
                .bind(address_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if address.is_none() {
            return Err(OrderError::AddressNotFound);
        }

        let now = Utc::now();
        let mut product_names = Vec::with_capacity(lines.len());
        for line in lines {
            let name: Option<String> = sqlx::query_scalar("SELECT name FROM products WHERE id = ?")
                .bind(line.product_id)
                .fetch_optional(&mut *tx)
                .await?;
            let name = name.ok_or(OrderError::ProductNotFound(line.product_id))?;

            let decremented = sqlx::query(
                "UPDATE products
                 SET available_stock = available_stock - ?1, updated_at = ?2
                 WHERE id = ?3 AND available_stock >= ?1",
            )
            .bind(i64::from(line.quantity))
            .bind(now)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await?;
            if decremented.rows_affected() == 0 {
                return Err(OrderError::OutOfStock { name });
            }

            product_names.push(name);
        }

        let query = format!(
            "INSERT INTO orders (user_id, address_id, status, payment_method, subtotal,
                                 delivery_fee, tax, total, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .bind(address_id)
            .bind(OrderStatus::Pending)
            .bind(payment_method)
            .bind(subtotal)
            .bind(delivery_fee)
            .bind(tax)
            .bind(total)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        let mut items = Vec::with_capacity(lines.len());
        for (line, name) in lines.iter().zip(product_names) {
            let item = sqlx::query_as::<_, OrderItem>(
                "INSERT INTO order_items (order_id, product_id, product_name, unit_price, quantity)
                 VALUES (?, ?, ?, ?, ?)
                 RETURNING id, order_id, product_id, product_name, unit_price, quantity",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(name)
            .bind(line.unit_price)
            .bind(i64::from(line.quantity))
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        sqlx::query("DELETE FROM cart_lines WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            total = %order.total,
            "Order placed"
        );
        Ok(OrderWithItems { order, items })
    }

    /// Change an order's status, enforcing the status machine.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown order and
    /// `OrderError::InvalidTransition` when the move is not allowed.
    pub async fn update_status(
        &self,
        id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let order = self.orders.get(id).await?.ok_or(OrderError::NotFound)?;

        if !order.status.can_transition_to(new_status) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: new_status,
            });
        }

        let updated = self
            .orders
            .update_status(id, new_status)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => OrderError::NotFound,
                other => OrderError::Repository(other),
            })?;

        tracing::info!(
            order_id = %id,
            from = %order.status,
            to = %new_status,
            "Order status changed"
        );
        Ok(updated)
    }
}

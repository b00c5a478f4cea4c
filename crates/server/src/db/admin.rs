//! Admin read models: dashboard rollups and the cross-user order listing.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;

use trikart_core::{AddressId, Money, OrderId, UserId};

use super::RepositoryError;
use crate::models::{Address, AdminOrder, Order, OrderItem, Payment, UserSummary};

/// Dashboard counters.
///
/// Revenue is summed over order totals in Rust rather than in SQL;
/// SQLite would coerce the TEXT amounts to floats first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_orders: i64,
    pub total_revenue: Money,
}

/// Pages of orders are selected newest first; the page membership
/// subquery is repeated per joined table so every query stays static.
const ORDER_PAGE_IDS: &str =
    "SELECT id FROM orders ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2";

/// Repository for the admin surface.
pub struct AdminRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Compute the dashboard counters.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a stored total fails
    /// to parse.
    pub async fn stats(&self) -> Result<DashboardStats, RepositoryError> {
        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        let total_orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;
        let totals: Vec<Money> = sqlx::query_scalar("SELECT total FROM orders")
            .fetch_all(self.pool)
            .await?;

        Ok(DashboardStats {
            total_users,
            total_orders,
            total_revenue: totals.into_iter().sum(),
        })
    }

    /// Count all orders, for pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn count_orders(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// List one page of orders across all users, newest first, with
    /// items, delivery address, purchaser, and payment attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if an order references
    /// a missing address or user.
    pub async fn list_orders_page(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminOrder>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, address_id, status, payment_method, subtotal, \
                    delivery_fee, tax, total, created_at, updated_at
             FROM orders ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT id, order_id, product_id, product_name, unit_price, quantity
             FROM order_items WHERE order_id IN ({ORDER_PAGE_IDS}) ORDER BY id ASC"
        );
        let items = sqlx::query_as::<_, OrderItem>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let query = format!(
            "SELECT id, user_id, label, house, street, landmark, line2, city, created_at, updated_at
             FROM addresses WHERE id IN (SELECT address_id FROM orders
                 WHERE id IN ({ORDER_PAGE_IDS}))"
        );
        let addresses = sqlx::query_as::<_, Address>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let query = format!(
            "SELECT id, name, email, phone FROM users
             WHERE id IN (SELECT user_id FROM orders WHERE id IN ({ORDER_PAGE_IDS}))"
        );
        let users = sqlx::query_as::<_, UserSummary>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let query = format!(
            "SELECT id, order_id, provider, amount, status, created_at
             FROM payments WHERE order_id IN ({ORDER_PAGE_IDS})"
        );
        let payments = sqlx::query_as::<_, Payment>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let mut items_by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in items {
            items_by_order.entry(item.order_id).or_default().push(item);
        }
        let addresses_by_id: HashMap<AddressId, Address> =
            addresses.into_iter().map(|a| (a.id, a)).collect();
        let users_by_id: HashMap<UserId, UserSummary> =
            users.into_iter().map(|u| (u.id, u)).collect();
        let mut payments_by_order: HashMap<OrderId, Payment> =
            payments.into_iter().map(|p| (p.order_id, p)).collect();

        orders
            .into_iter()
            .map(|order| {
                let address = addresses_by_id.get(&order.address_id).cloned().ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "order {} references missing address {}",
                        order.id, order.address_id
                    ))
                })?;
                let user = users_by_id.get(&order.user_id).cloned().ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "order {} references missing user {}",
                        order.id, order.user_id
                    ))
                })?;
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                let payment = payments_by_order.remove(&order.id);

                Ok(AdminOrder {
                    order,
                    items,
                    address,
                    user,
                    payment,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::db::users::{NewUser, UserRepository};
    use trikart_core::{City, Email, Role};

    async fn seed_user(pool: &SqlitePool, email: &str) -> UserId {
        let email = Email::parse(email).unwrap();
        UserRepository::new(pool)
            .create(NewUser {
                name: "Admin Fixture",
                phone: "9800000003",
                email: &email,
                password_hash: "x",
                city: City::Chandigarh,
                role: Role::User,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_order(pool: &SqlitePool, user_id: UserId, total: &str, paid: bool) -> OrderId {
        let address_id: i64 = sqlx::query_scalar(
            "INSERT INTO addresses (user_id, label, house, street, city)
             VALUES (?, 'Home', '45', 'Phase 3B2', 'Mohali') RETURNING id",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (user_id, address_id, status, payment_method, subtotal, delivery_fee, tax, total)
             VALUES (?, ?, 'pending', 'upi', '200', '99', '36', ?) RETURNING id",
        )
        .bind(user_id)
        .bind(address_id)
        .bind(total)
        .fetch_one(pool)
        .await
        .unwrap();

        if paid {
            sqlx::query(
                "INSERT INTO payments (order_id, provider, amount, status)
                 VALUES (?, 'razorpay', ?, 'captured')",
            )
            .bind(order_id)
            .bind(total)
            .execute(pool)
            .await
            .unwrap();
        }

        OrderId::new(order_id)
    }

    #[tokio::test]
    async fn test_stats_counts_and_sums() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool, "stats@example.com").await;
        seed_order(&pool, user_id, "335", false).await;
        seed_order(&pool, user_id, "120.50", false).await;

        let stats = AdminRepository::new(&pool).stats().await.unwrap();
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_revenue, Money::parse("455.50").unwrap());
    }

    #[tokio::test]
    async fn test_stats_on_empty_database() {
        let pool = test_pool().await;

        let stats = AdminRepository::new(&pool).stats().await.unwrap();
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.total_revenue, Money::ZERO);
    }

    #[tokio::test]
    async fn test_order_listing_embeds_related_rows() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool, "embed@example.com").await;
        let unpaid = seed_order(&pool, user_id, "335", false).await;
        let paid = seed_order(&pool, user_id, "500", true).await;
        let repo = AdminRepository::new(&pool);

        let page = repo.list_orders_page(50, 0).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].order.id, paid);
        assert_eq!(page[1].order.id, unpaid);
        assert_eq!(page[0].user.name, "Admin Fixture");
        assert_eq!(page[0].address.city, City::Mohali);
        assert_eq!(
            page[0].payment.as_ref().map(|p| p.provider.as_str()),
            Some("razorpay")
        );
        assert!(page[1].payment.is_none());
        assert_eq!(repo.count_orders().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_order_listing_paginates() {
        let pool = test_pool().await;
        let user_id = seed_user(&pool, "page@example.com").await;
        for _ in 0..3 {
            seed_order(&pool, user_id, "335", false).await;
        }
        let repo = AdminRepository::new(&pool);

        let first = repo.list_orders_page(2, 0).await.unwrap();
        let second = repo.list_orders_page(2, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert!(repo.list_orders_page(2, 4).await.unwrap().is_empty());
    }
}

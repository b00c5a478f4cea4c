//! Cart repository.
//!
//! Quantities are absolute: adding a product that is already in the cart
//! replaces the line's quantity rather than incrementing it. Stock is
//! checked against the catalog inside the same transaction as the write,
//! so two racing adds cannot both slip past the cap.

use chrono::Utc;
use sqlx::SqlitePool;

use trikart_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartLine, CartLineDetail};

/// Repository for per-user cart lines.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a product to the cart, or replace its quantity if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist
    /// and `RepositoryError::Conflict` if the quantity exceeds the
    /// product's available stock.
    pub async fn upsert(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartLine, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let product: Option<(String, i64)> =
            sqlx::query_as("SELECT name, available_stock FROM products WHERE id = ?")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (name, available_stock) = product.ok_or(RepositoryError::NotFound)?;
        if quantity > available_stock {
            return Err(RepositoryError::Conflict(format!(
                "Only {available_stock} of '{name}' in stock"
            )));
        }

        let now = Utc::now();
        let line = sqlx::query_as::<_, CartLine>(
            "INSERT INTO cart_lines (user_id, product_id, quantity, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (user_id, product_id)
             DO UPDATE SET quantity = excluded.quantity, updated_at = excluded.updated_at
             RETURNING id, user_id, product_id, quantity, created_at, updated_at",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(line)
    }

    /// List the cart joined with live product data, oldest line first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartLineDetail>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLineDetail>(
            "SELECT c.id, c.product_id, c.quantity, p.name, p.price, p.image_url, p.available_stock
             FROM cart_lines c
             JOIN products p ON p.id = c.product_id
             WHERE c.user_id = ?
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Remove one product's line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in the
    /// cart.
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE user_id = ? AND product_id = ?")
            .bind(user_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Empty the cart. Removing from an already empty cart is fine.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_lines WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::catalog::{CatalogRepository, NewCategory, NewProduct};
    use crate::db::test_pool;
    use crate::db::users::{NewUser, UserRepository};
    use trikart_core::{City, Email, Money, Role};

    async fn seed(pool: &SqlitePool) -> (UserId, ProductId) {
        let email = Email::parse("cart@example.com").unwrap();
        let user = UserRepository::new(pool)
            .create(NewUser {
                name: "Cart Tester",
                phone: "9800000001",
                email: &email,
                password_hash: "x",
                city: City::Mohali,
                role: Role::User,
            })
            .await
            .unwrap();

        let catalog = CatalogRepository::new(pool);
        let category = catalog
            .insert_category(&NewCategory {
                name: "Snacks",
                description: None,
                image_url: None,
            })
            .await
            .unwrap();
        let product = catalog
            .insert_product(&NewProduct {
                category_id: category.id,
                name: "Masala Peanuts 200g",
                description: None,
                image_url: None,
                price: Money::from_rupees(60),
                original_price: None,
                available_stock: 5,
                is_featured: false,
                is_bestseller: false,
                rating: 4.0,
                review_count: 12,
                tax_percent: 18.0,
            })
            .await
            .unwrap();

        (user.id, product.id)
    }

    #[tokio::test]
    async fn test_upsert_replaces_quantity() {
        let pool = test_pool().await;
        let (user_id, product_id) = seed(&pool).await;
        let repo = CartRepository::new(&pool);

        let first = repo.upsert(user_id, product_id, 2).await.unwrap();
        assert_eq!(first.quantity, 2);

        let second = repo.upsert(user_id, product_id, 3).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.quantity, 3);

        let lines = repo.list(user_id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_upsert_over_stock_is_conflict() {
        let pool = test_pool().await;
        let (user_id, product_id) = seed(&pool).await;
        let repo = CartRepository::new(&pool);

        let result = repo.upsert(user_id, product_id, 6).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert!(repo.list(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_unknown_product_is_not_found() {
        let pool = test_pool().await;
        let (user_id, _) = seed(&pool).await;

        let result = CartRepository::new(&pool)
            .upsert(user_id, ProductId::new(404), 1)
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_joins_live_product_data() {
        let pool = test_pool().await;
        let (user_id, product_id) = seed(&pool).await;
        let repo = CartRepository::new(&pool);
        repo.upsert(user_id, product_id, 2).await.unwrap();

        let lines = repo.list(user_id).await.unwrap();
        assert_eq!(lines[0].name, "Masala Peanuts 200g");
        assert_eq!(lines[0].price, Money::from_rupees(60));
        assert_eq!(lines[0].available_stock, 5);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let pool = test_pool().await;
        let (user_id, product_id) = seed(&pool).await;
        let repo = CartRepository::new(&pool);
        repo.upsert(user_id, product_id, 1).await.unwrap();

        repo.remove(user_id, product_id).await.unwrap();
        let again = repo.remove(user_id, product_id).await;
        assert!(matches!(again, Err(RepositoryError::NotFound)));

        repo.upsert(user_id, product_id, 1).await.unwrap();
        repo.clear(user_id).await.unwrap();
        assert!(repo.list(user_id).await.unwrap().is_empty());
        repo.clear(user_id).await.unwrap();
    }
}

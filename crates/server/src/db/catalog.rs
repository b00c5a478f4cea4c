//! Category and product read model, plus the insert helpers used by the
//! seeding command.

use chrono::Utc;
use sqlx::SqlitePool;

use trikart_core::{CategoryId, Money, ProductId};

use super::RepositoryError;
use crate::models::{Category, Product, ProductWithCategory};

/// Optional filter predicates for product listings.
///
/// Unset filters match everything; set filters are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    pub search: Option<String>,
    pub is_featured: Option<bool>,
    pub is_bestseller: Option<bool>,
}

/// Fields for inserting a category.
#[derive(Debug)]
pub struct NewCategory<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

/// Fields for inserting a product.
#[derive(Debug)]
pub struct NewProduct<'a> {
    pub category_id: CategoryId,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub price: Money,
    pub original_price: Option<Money>,
    pub available_stock: i64,
    pub is_featured: bool,
    pub is_bestseller: bool,
    pub rating: f64,
    pub review_count: i64,
    pub tax_percent: f64,
}

const PRODUCT_COLUMNS: &str = "id, category_id, name, description, image_url, price, \
     original_price, available_stock, is_featured, is_bestseller, rating, review_count, \
     tax_percent, created_at, updated_at";

/// Repository for the catalog tables.
pub struct CatalogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every category, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, image_url, created_at
             FROM categories ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Fetch one category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, image_url, created_at
             FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// List products matching the filter, alphabetically.
    ///
    /// Each predicate is passed twice to SQLite under a single numbered
    /// placeholder, so unset filters collapse to `NULL IS NULL` and match
    /// every row. Search is a case-insensitive substring match on the name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        let pattern = filter.search.as_deref().map(escape_like);

        let query = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE (?1 IS NULL OR category_id = ?1)
               AND (?2 IS NULL OR name LIKE '%' || ?2 || '%' ESCAPE '\\')
               AND (?3 IS NULL OR is_featured = ?3)
               AND (?4 IS NULL OR is_bestseller = ?4)
             ORDER BY name ASC, id ASC"
        );

        let products = sqlx::query_as::<_, Product>(&query)
            .bind(filter.category_id)
            .bind(pattern)
            .bind(filter.is_featured)
            .bind(filter.is_bestseller)
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Fetch one product joined with its category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the product's category
    /// row is missing.
    pub async fn get_product(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithCategory>, RepositoryError> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?");
        let Some(product) = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };

        let category = self
            .get_category(product.category_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "product {} references missing category {}",
                    product.id, product.category_id
                ))
            })?;

        Ok(Some(ProductWithCategory { product, category }))
    }

    /// Count the products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn count_products(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Insert a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    pub async fn insert_category(
        &self,
        category: &NewCategory<'_>,
    ) -> Result<Category, RepositoryError> {
        let created = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description, image_url, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING id, name, description, image_url, created_at",
        )
        .bind(category.name)
        .bind(category.description)
        .bind(category.image_url)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "category '{}' already exists",
                    category.name
                ));
            }
            RepositoryError::from(e)
        })?;

        Ok(created)
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on query failure.
    pub async fn insert_product(
        &self,
        product: &NewProduct<'_>,
    ) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO products (category_id, name, description, image_url, price, \
                  original_price, available_stock, is_featured, is_bestseller, rating, \
                  review_count, tax_percent, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {PRODUCT_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Product>(&query)
            .bind(product.category_id)
            .bind(product.name)
            .bind(product.description)
            .bind(product.image_url)
            .bind(product.price)
            .bind(product.original_price)
            .bind(product.available_stock)
            .bind(product.is_featured)
            .bind(product.is_bestseller)
            .bind(product.rating)
            .bind(product.review_count)
            .bind(product.tax_percent)
            .bind(now)
            .bind(now)
            .fetch_one(self.pool)
            .await?;

        Ok(created)
    }

    /// Delete every product and category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if order items still reference
    /// catalog rows.
    pub async fn clear_catalog(&self) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let outcome: Result<(), sqlx::Error> = async {
            sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
            sqlx::query("DELETE FROM categories").execute(&mut *tx).await?;
            Ok(())
        }
        .await;

        if let Err(e) = outcome {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return Err(RepositoryError::Conflict(
                    "catalog rows are referenced by existing orders".to_owned(),
                ));
            }
            return Err(e.into());
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

//! Product route handlers.
//!
//! Filters mirror the client's query strings: `categoryId` (legacy
//! `category`), `search` for a case-insensitive name substring, and the
//! `isFeatured`/`isBestseller` flags, which only filter when the literal
//! string `true` is sent. Anything else, including `false`, means "no
//! filter" rather than "only non-featured".

use axum::extract::State;
use serde::Deserialize;

use trikart_core::{CategoryId, ProductId};

use crate::db::CatalogRepository;
use crate::db::catalog::ProductFilter;
use crate::error::{AppError, Json, Path, Query, Result};
use crate::middleware::RequireAuth;
use crate::models::{Product, ProductWithCategory};
use crate::state::AppState;

/// Product listing query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(alias = "category", alias = "category_id")]
    pub category_id: Option<CategoryId>,
    pub search: Option<String>,
    pub is_featured: Option<String>,
    pub is_bestseller: Option<String>,
}

impl ProductQuery {
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            category_id: self.category_id,
            search: self
                .search
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty()),
            is_featured: true_flag(self.is_featured.as_deref()),
            is_bestseller: true_flag(self.is_bestseller.as_deref()),
        }
    }
}

fn true_flag(value: Option<&str>) -> Option<bool> {
    (value == Some("true")).then_some(true)
}

/// List products matching the query filters.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_claims): RequireAuth,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let catalog = CatalogRepository::new(state.pool());
    let products = catalog.list_products(&query.into_filter()).await?;

    Ok(Json(products))
}

/// One product with its category.
///
/// # Errors
///
/// Returns 404 for an unknown product.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_claims): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductWithCategory>> {
    let catalog = CatalogRepository::new(state.pool());
    let product = catalog
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(product))
}

//! Category route handlers. Both reads are public.

use axum::extract::State;

use trikart_core::CategoryId;

use crate::db::CatalogRepository;
use crate::db::catalog::ProductFilter;
use crate::error::{AppError, Json, Path, Result};
use crate::models::{Category, CategoryWithProducts};
use crate::state::AppState;

/// List all categories.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let catalog = CatalogRepository::new(state.pool());
    let categories = catalog.list_categories().await?;

    Ok(Json(categories))
}

/// One category with every product in it.
///
/// # Errors
///
/// Returns 404 for an unknown category.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<CategoryWithProducts>> {
    let catalog = CatalogRepository::new(state.pool());
    let category = catalog
        .get_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_owned()))?;
    let products = catalog
        .list_products(&ProductFilter {
            category_id: Some(id),
            ..ProductFilter::default()
        })
        .await?;

    Ok(Json(CategoryWithProducts { category, products }))
}

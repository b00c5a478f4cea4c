//! Admin route handlers: dashboard stats and paginated listings.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::admin::DashboardStats;
use crate::db::{AdminRepository, UserRepository};
use crate::error::{Json, Query, Result};
use crate::middleware::RequireAdmin;
use crate::models::{AdminOrder, User};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

/// Pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Normalize to a 1-based page and a bounded limit.
    fn normalize(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, limit)
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

/// Dashboard totals: users, orders, revenue.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
) -> Result<Json<DashboardStats>> {
    let admin = AdminRepository::new(state.pool());
    let stats = admin.stats().await?;

    Ok(Json(stats))
}

/// Paginated user listing.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<User>>> {
    let (page, limit) = query.normalize();
    let users = UserRepository::new(state.pool());
    let items = users.list_page(limit, (page - 1) * limit).await?;
    let total = users.count().await?;

    Ok(Json(Paginated {
        items,
        page,
        limit,
        total,
    }))
}

/// Paginated order listing with items, address, purchaser, and payment.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<AdminOrder>>> {
    let (page, limit) = query.normalize();
    let admin = AdminRepository::new(state.pool());
    let items = admin.list_orders_page(limit, (page - 1) * limit).await?;
    let total = admin.count_orders().await?;

    Ok(Json(Paginated {
        items,
        page,
        limit,
        total,
    }))
}

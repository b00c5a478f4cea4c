//! Address book route handlers. Everything is scoped to the caller.

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use trikart_core::{AddressId, City};

use crate::db::addresses::NewAddress;
use crate::db::{AddressRepository, RepositoryError};
use crate::error::{AppError, Json, Path, Result};
use crate::middleware::RequireAuth;
use crate::models::Address;
use crate::state::AppState;

use super::MessageResponse;

/// Address create/update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub label: String,
    pub house: String,
    pub street: String,
    pub landmark: Option<String>,
    pub line2: Option<String>,
    pub city: String,
}

impl AddressRequest {
    /// Validate the body into repository input, borrowing from `self`.
    fn as_new_address(&self) -> Result<NewAddress<'_>> {
        Ok(NewAddress {
            label: non_blank(&self.label, "label")?,
            house: non_blank(&self.house, "house")?,
            street: non_blank(&self.street, "street")?,
            landmark: optional(self.landmark.as_deref()),
            line2: optional(self.line2.as_deref()),
            city: City::parse(&self.city).map_err(|e| AppError::Validation(e.to_string()))?,
        })
    }
}

fn non_blank<'v>(value: &'v str, field: &'static str) -> Result<&'v str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

/// Trim an optional field, treating a blank value as absent.
fn optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Create a delivery address.
///
/// # Errors
///
/// Returns 400 for blank fields or an unserviceable city.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Json(body): Json<AddressRequest>,
) -> Result<(StatusCode, Json<Address>)> {
    let new_address = body.as_new_address()?;
    let addresses = AddressRepository::new(state.pool());
    let address = addresses.create(claims.user_id(), &new_address).await?;

    Ok((StatusCode::CREATED, Json(address)))
}

/// List the caller's addresses.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<Vec<Address>>> {
    let addresses = AddressRepository::new(state.pool());
    let list = addresses.list_for_user(claims.user_id()).await?;

    Ok(Json(list))
}

/// Replace an address's fields.
///
/// # Errors
///
/// Returns 404 for an address the caller does not own.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<AddressId>,
    Json(body): Json<AddressRequest>,
) -> Result<Json<Address>> {
    let new_address = body.as_new_address()?;
    let addresses = AddressRepository::new(state.pool());
    let address = addresses
        .update(id, claims.user_id(), &new_address)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Address not found".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(address))
}

/// Delete an address.
///
/// # Errors
///
/// Returns 404 for an address the caller does not own and 409 when the
/// address is referenced by existing orders.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<MessageResponse>> {
    let addresses = AddressRepository::new(state.pool());
    addresses
        .delete(id, claims.user_id())
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Address not found".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(MessageResponse::new("Address deleted")))
}

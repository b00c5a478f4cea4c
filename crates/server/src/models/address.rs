//! Delivery address types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use trikart_core::{AddressId, City, UserId};

/// A saved delivery address, owned by one user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub label: String,
    pub house: String,
    pub street: String,
    pub landmark: Option<String>,
    pub line2: Option<String>,
    pub city: City,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

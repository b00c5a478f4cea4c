//! Payment record types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use trikart_core::{Money, OrderId, PaymentId};

/// A payment record attached to an order.
///
/// At most one per order. Cash-on-delivery orders never get one.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub provider: String,
    pub amount: Money,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

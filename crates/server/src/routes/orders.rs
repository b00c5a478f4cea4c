//! Order route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;

use trikart_core::{AddressId, Money, OrderId, OrderStatus, PaymentMethod, ProductId};

use crate::db::OrderRepository;
use crate::error::{AppError, Json, Path, Result, add_breadcrumb};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{Order, OrderWithItems};
use crate::services::orders::{OrderLine, OrderService};
use crate::state::AppState;

/// One requested order line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[serde(alias = "product_id")]
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: Decimal,
}

/// Order placement request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(alias = "order_items")]
    pub items: Vec<OrderItemRequest>,
    #[serde(alias = "address_id", alias = "deliveryAddress")]
    pub address_id: AddressId,
    #[serde(alias = "payment_method")]
    pub payment_method: PaymentMethod,
    #[serde(default, alias = "total_amount")]
    pub total_amount: Option<Decimal>,
}

/// Status change request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

impl OrderItemRequest {
    fn into_line(self) -> Result<OrderLine> {
        let quantity = u32::try_from(self.quantity)
            .map_err(|_| AppError::Validation("Item quantity must be positive".to_owned()))?;
        let unit_price = Money::new(self.price)
            .map_err(|e| AppError::Validation(format!("Invalid item price: {e}")))?;

        Ok(OrderLine {
            product_id: self.product_id,
            quantity,
            unit_price,
        })
    }
}

/// Place an order from the submitted lines.
///
/// # Errors
///
/// Returns 400 for validation failures including a total outside the
/// accepted tolerance, 404 for unknown address or product, and 409 when
/// stock runs short.
pub async fn place(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderWithItems>)> {
    let lines = body
        .items
        .into_iter()
        .map(OrderItemRequest::into_line)
        .collect::<Result<Vec<_>>>()?;
    let client_total = body
        .total_amount
        .map(Money::new)
        .transpose()
        .map_err(|e| AppError::Validation(format!("Invalid total amount: {e}")))?;

    add_breadcrumb("orders", format!("place order with {} lines", lines.len()));

    let service = OrderService::new(state.pool());
    let placed = service
        .place(
            claims.user_id(),
            &lines,
            body.address_id,
            body.payment_method,
            client_total,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(placed)))
}

/// The caller's orders, newest first.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<Vec<OrderWithItems>>> {
    let orders = OrderRepository::new(state.pool());
    let list = orders.list_for_user(claims.user_id()).await?;

    Ok(Json(list))
}

/// One order, visible to its owner only.
///
/// # Errors
///
/// Returns 404 for an unknown order or one owned by someone else.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderWithItems>> {
    let orders = OrderRepository::new(state.pool());
    let order = orders
        .get_for_user(id, claims.user_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    Ok(Json(order))
}

/// Change an order's status. Admin only.
///
/// # Errors
///
/// Returns 400 for a transition the status machine forbids and 404 for
/// an unknown order.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let service = OrderService::new(state.pool());
    let order = service.update_status(id, body.status).await?;

    Ok(Json(order))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_place_request_accepts_legacy_field_names() {
        let body: PlaceOrderRequest = serde_json::from_str(
            r#"{
                "order_items": [{"product_id": 3, "quantity": 2, "price": "120.00"}],
                "deliveryAddress": 9,
                "payment_method": "cod",
                "total_amount": 375
            }"#,
        )
        .unwrap();

        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].product_id, ProductId::new(3));
        assert_eq!(body.address_id, AddressId::new(9));
        assert_eq!(body.payment_method, PaymentMethod::Cod);
        assert_eq!(body.total_amount, Some(Decimal::from(375)));
    }

    #[test]
    fn test_item_request_rejects_bad_values() {
        let negative_quantity = OrderItemRequest {
            product_id: ProductId::new(1),
            quantity: -1,
            price: Decimal::from(100),
        };
        assert!(negative_quantity.into_line().is_err());

        let negative_price = OrderItemRequest {
            product_id: ProductId::new(1),
            quantity: 1,
            price: Decimal::from(-100),
        };
        assert!(negative_price.into_line().is_err());
    }
}

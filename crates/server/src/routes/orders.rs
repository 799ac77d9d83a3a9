//! Order handlers: checkout, reads, and bulk admin actions.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use bookstack_core::{BookId, OrderId};

use crate::db::orders::{BulkDeleteOutcome, BulkStatusOutcome};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::{NewOrder, NewOrderItem, Order};
use crate::state::AppState;

/// One requested order line.
#[derive(Debug, Deserialize)]
pub struct OrderItemInput {
    pub book_id: i64,
    pub quantity: i64,
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Client-supplied total, inclusive of tax/shipping. Stored verbatim.
    pub total_price: Decimal,
    pub items: Vec<OrderItemInput>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        Self {
            customer_name: request.customer_name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            postal_code: request.postal_code,
            total_price: request.total_price,
            items: request
                .items
                .into_iter()
                .map(|item| NewOrderItem {
                    book_id: BookId::new(item.book_id),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Input for bulk status updates.
#[derive(Debug, Deserialize)]
pub struct BulkStatusInput {
    pub order_ids: Vec<OrderId>,
    /// Raw status string; validated by the ledger so invalid values
    /// surface as `InvalidStatus` rather than a deserialization error.
    pub status: String,
}

/// Input for bulk deletes.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteInput {
    pub order_ids: Vec<OrderId>,
}

/// `POST /orders` - checkout.
#[instrument(skip(state, request))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.orders().checkout(request.into()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders` - list all orders with items.
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.orders().list().await?;
    Ok(Json(orders))
}

/// `GET /orders/{id}` - fetch one order with items.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders()
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;
    Ok(Json(order))
}

/// `PUT /orders/bulk-status` - transition orders, all-or-nothing.
#[instrument(skip(_admin, state, input))]
pub async fn bulk_update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BulkStatusInput>,
) -> Result<Json<BulkStatusOutcome>, AppError> {
    let outcome = state
        .orders()
        .bulk_update_status(&input.order_ids, &input.status)
        .await?;
    Ok(Json(outcome))
}

/// `DELETE /orders/bulk-delete` - delete orders, returning stock first.
#[instrument(skip(_admin, state, input))]
pub async fn bulk_delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BulkDeleteInput>,
) -> Result<Json<BulkDeleteOutcome>, AppError> {
    let outcome = state.orders().bulk_delete(&input.order_ids).await?;
    Ok(Json(outcome))
}

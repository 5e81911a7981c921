use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::AuthUser;
use crate::api::AppState;
use crate::domain::money::format_price;
use crate::domain::order::{Order, OrderItem, OrderStatus, OrderSummary, PlaceOrder};

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub unit_price_display: String,
    pub subtotal_cents: i64,
    pub subtotal_display: String,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            unit_price_display: format_price(item.unit_price_cents),
            subtotal_cents: item.subtotal_cents,
            subtotal_display: format_price(item.subtotal_cents),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub total_display: String,
    pub notes: Option<String>,
    pub delivery_address: String,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            status: order.status,
            total_cents: order.total_cents,
            total_display: format_price(order.total_cents),
            notes: order.notes,
            delivery_address: order.delivery_address,
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

pub(crate) fn to_responses(orders: Vec<Order>) -> Vec<OrderResponse> {
    orders.into_iter().map(OrderResponse::from).collect()
}

/// Place an order for the signed-in customer
///
/// POST /api/orders
pub async fn place_order(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<PlaceOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(request) = payload?;
    let order = state.orders.place(auth.id, request).await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// The signed-in customer's orders, newest first
///
/// GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.orders.list_for_user(auth.id).await?;
    Ok(Json(to_responses(orders)))
}

/// Order counts for the customer dashboard
///
/// GET /api/orders/summary
pub async fn order_summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<OrderSummary>, ApiError> {
    Ok(Json(state.orders.summary_for_user(auth.id).await?))
}

/// One of the signed-in customer's orders
///
/// GET /api/orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.find_for_user(auth.id, id).await?;
    Ok(Json(order.into()))
}

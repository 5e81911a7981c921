// Administrator routes; every handler requires `AdminUser`

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::orders::{self, OrderResponse};
use super::products::{self, ProductRequest, ProductResponse};
use super::users::UserResponse;
use crate::api::errors::ApiError;
use crate::api::middleware::AdminUser;
use crate::api::AppState;
use crate::domain::order::OrderStatus;
use crate::domain::product::ProductDraft;
use crate::domain::user::Role;

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PUT /api/admin/users/:id/role
pub async fn set_user_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<RoleRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(req) = payload?;
    if id == admin.id && req.role != Role::Admin {
        return Err(ApiError::bad_request("Administrators cannot revoke their own access"));
    }

    state.users.set_role(id, req.role).await?;
    Ok(Json(state.users.find(id).await?.into()))
}

/// Whole catalog, inactive products included
///
/// GET /api/admin/products
pub async fn list_products(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let all = state.products.list_all().await?;
    Ok(Json(products::to_responses(all)))
}

/// POST /api/admin/products
pub async fn create_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let Json(req) = payload?;
    let product = state.products.create(ProductDraft::try_from(req)?).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /api/admin/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let Json(req) = payload?;
    let product = state
        .products
        .update(id, ProductDraft::try_from(req)?)
        .await?;
    Ok(Json(product.into()))
}

/// Soft delete: the product is deactivated, never removed
///
/// DELETE /api/admin/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.products.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let all = state.orders.list_all().await?;
    Ok(Json(orders::to_responses(all)))
}

/// PUT /api/admin/orders/:id/status
pub async fn update_order_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let Json(req) = payload?;
    let order = state.orders.update_status(id, req.status).await?;
    Ok(Json(order.into()))
}

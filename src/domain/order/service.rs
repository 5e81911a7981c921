use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::order::{Order, OrderLine, OrderSummary};
use super::value_objects::OrderStatus;
use crate::domain::repositories::{OrderRepository, ProductRepository};
use crate::domain::DomainError;

/// A customer's checkout request
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrder {
    pub items: Vec<OrderLine>,
    pub delivery_address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Order placement and fulfilment
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { orders, products }
    }

    /// Prices the requested lines against the current catalog and stores the order
    pub async fn place(&self, user_id: Uuid, request: PlaceOrder) -> Result<Order, DomainError> {
        let product_ids: Vec<Uuid> = request.items.iter().map(|line| line.product_id).collect();
        let products = self.products.find_many(&product_ids).await?;

        let order = Order::place(
            user_id,
            &request.items,
            &products,
            &request.delivery_address,
            request.notes.as_deref(),
        )?;

        self.orders.create(&order).await?;
        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            items = order.items.len(),
            total_cents = order.total_cents,
            "Order placed"
        );

        Ok(order)
    }

    pub async fn find(&self, id: Uuid) -> Result<Order, DomainError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Order not found: {}", id)))
    }

    /// Finds an order on behalf of a customer
    ///
    /// Orders of other customers are reported as not found.
    pub async fn find_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Order, DomainError> {
        match self.find(id).await? {
            order if order.user_id == user_id => Ok(order),
            _ => Err(DomainError::not_found(format!("Order not found: {}", id))),
        }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.orders.find_by_user(user_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        self.orders.list_all().await
    }

    /// Moves an order along its lifecycle
    pub async fn update_status(&self, id: Uuid, next: OrderStatus) -> Result<Order, DomainError> {
        let mut order = self.find(id).await?;
        let previous = order.status;
        order.change_status(next)?;

        self.orders.update_status(id, next).await?;
        tracing::info!(order_id = %id, from = %previous, to = %next, "Order status changed");

        Ok(order)
    }

    pub async fn summary_for_user(&self, user_id: Uuid) -> Result<OrderSummary, DomainError> {
        let orders = self.orders.find_by_user(user_id).await?;
        Ok(OrderSummary::from_orders(&orders))
    }
}

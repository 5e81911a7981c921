use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus};

/// Repository trait for the Order aggregate
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order with its items and take the ordered quantities
    /// out of product stock
    ///
    /// Implementations must apply all of it or none of it. A product whose
    /// stock dropped below the ordered quantity in the meantime yields
    /// `DomainError::Rule`.
    async fn create(&self, order: &Order) -> Result<Uuid, DomainError>;

    /// Find an order by ID, items included
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;

    /// Orders of one user, newest first, items included
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError>;

    /// All orders, newest first, items included
    async fn list_all(&self) -> Result<Vec<Order>, DomainError>;

    /// Persist a status change
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), DomainError>;
}

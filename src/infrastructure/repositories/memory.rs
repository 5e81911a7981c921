use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::order::{Order, OrderStatus};
use crate::domain::product::Product;
use crate::domain::repositories::{
    OrderRepository, ProductRepository, UniqueField, UserRepository,
};
use crate::domain::user::{Email, Role, User};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    products: HashMap<Uuid, Product>,
    orders: HashMap<Uuid, Order>,
}

/// In-process store implementing every repository trait
///
/// Used when no `DATABASE_URL` is configured and by the test suites. A single
/// lock guards all tables so an order insert and its stock updates are applied
/// together, like the PostgreSQL transaction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_unique(user: &User, field: UniqueField, value: &str) -> bool {
    match field {
        UniqueField::Email => user.email.as_str() == value,
        UniqueField::Cpf => user.cpf.formatted() == value,
    }
}

fn conflicting_field(users: &HashMap<Uuid, User>, candidate: &User) -> Option<UniqueField> {
    [UniqueField::Email, UniqueField::Cpf]
        .into_iter()
        .find(|&field| {
            let value = match field {
                UniqueField::Email => candidate.email.as_str().to_string(),
                UniqueField::Cpf => candidate.cpf.formatted(),
            };
            users
                .values()
                .any(|u| u.id != candidate.id && matches_unique(u, field, &value))
        })
}

fn newest_first<T, F>(mut items: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> Result<Uuid, DomainError> {
        let mut state = self.state.write().await;
        if let Some(field) = conflicting_field(&state.users, user) {
            return Err(DomainError::Conflict(field));
        }
        state.users.insert(user.id, user.clone());
        Ok(user.id)
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user.id) {
            return Err(DomainError::not_found(format!("User not found: {}", user.id)));
        }
        if let Some(field) = conflicting_field(&state.users, user) {
            return Err(DomainError::Conflict(field));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| &u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let users: Vec<User> = self.state.read().await.users.values().cloned().collect();
        Ok(newest_first(users, |u| u.created_at))
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&id) {
            Some(user) => {
                user.role = role;
                user.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists_with_value(
        &self,
        field: UniqueField,
        value: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .any(|u| Some(u.id) != exclude_id && matches_unique(u, field, value)))
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn create(&self, product: &Product) -> Result<Uuid, DomainError> {
        let mut state = self.state.write().await;
        state.products.insert(product.id, product.clone());
        Ok(product.id)
    }

    async fn update(&self, product: &Product) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state.products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }

    async fn list_active(&self) -> Result<Vec<Product>, DomainError> {
        let state = self.state.read().await;
        let products: Vec<Product> = state
            .products
            .values()
            .filter(|p| p.active)
            .cloned()
            .collect();
        Ok(newest_first(products, |p| p.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Product>, DomainError> {
        let state = self.state.read().await;
        let products: Vec<Product> = state.products.values().cloned().collect();
        Ok(newest_first(products, |p| p.created_at))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create(&self, order: &Order) -> Result<Uuid, DomainError> {
        let mut state = self.state.write().await;

        // Check everything before touching anything
        for item in &order.items {
            let product = state.products.get(&item.product_id).ok_or_else(|| {
                DomainError::not_found(format!("Product not found: {}", item.product_id))
            })?;
            if !product.active {
                return Err(DomainError::rule(format!(
                    "Product {} is no longer available",
                    product.name
                )));
            }
            if product.stock < item.quantity {
                return Err(DomainError::rule(format!(
                    "Insufficient stock for {}: {} available",
                    product.name, product.stock
                )));
            }
        }

        for item in &order.items {
            if let Some(product) = state.products.get_mut(&item.product_id) {
                product.stock -= item.quantity;
            }
        }
        state.orders.insert(order.id, order.clone());

        Ok(order.id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.state.read().await.orders.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let state = self.state.read().await;
        let orders: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(orders, |o| o.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        let orders: Vec<Order> = self.state.read().await.orders.values().cloned().collect();
        Ok(newest_first(orders, |o| o.created_at))
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("Order not found: {}", id)))?;
        order.status = status;
        order.updated_at = chrono::Utc::now();
        Ok(())
    }
}

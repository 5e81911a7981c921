use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::value_objects::OrderStatus;
use crate::domain::errors::DomainError;
use crate::domain::product::Product;
use crate::domain::validation::{validate_address, ValidationErrors};

/// One requested product and quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Line item of a placed order
///
/// The unit price is a snapshot of the product price when the order was
/// placed; later catalog changes do not affect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Order aggregate root
///
/// # Invariants
/// - Contains at least one item, each with a positive quantity
/// - `subtotal_cents == quantity * unit_price_cents` for every item
/// - `total_cents` is the sum of the item subtotals
/// - Status changes follow `OrderStatus::can_transition_to`
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub notes: Option<String>,
    pub delivery_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Builds a pending order from the requested lines
    ///
    /// # Arguments
    /// * `user_id` - The customer placing the order
    /// * `lines` - Requested products; repeated products are merged
    /// * `products` - Current catalog state of the requested products
    /// * `delivery_address` - Free-text address (validated like a user address)
    /// * `notes` - Optional customer notes
    ///
    /// # Business Rules Enforced
    /// - At least one line, every quantity positive
    /// - Every product exists, is active and has enough stock
    /// - Totals are computed with checked arithmetic
    pub fn place(
        user_id: Uuid,
        lines: &[OrderLine],
        products: &[Product],
        delivery_address: &str,
        notes: Option<&str>,
    ) -> Result<Self, DomainError> {
        let mut errors = ValidationErrors::new();
        errors.check("delivery_address", validate_address(delivery_address));
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        if lines.is_empty() {
            return Err(DomainError::rule("Order must contain at least one item"));
        }

        let order_id = Uuid::new_v4();
        let now = Utc::now();
        let mut items = Vec::with_capacity(lines.len());
        let mut total_cents: i64 = 0;

        for (product_id, quantity) in merge_lines(lines)? {
            let product = products
                .iter()
                .find(|p| p.id == product_id)
                .ok_or_else(|| DomainError::not_found(format!("Product not found: {}", product_id)))?;

            if !product.active {
                return Err(DomainError::rule(format!(
                    "Product unavailable: {}",
                    product.name
                )));
            }

            if !product.can_supply(quantity) {
                return Err(DomainError::rule(format!(
                    "Insufficient stock for {}: {} available",
                    product.name, product.stock
                )));
            }

            let subtotal_cents = i64::from(quantity)
                .checked_mul(product.price_cents)
                .ok_or_else(|| DomainError::rule("Order total out of range"))?;
            total_cents = total_cents
                .checked_add(subtotal_cents)
                .ok_or_else(|| DomainError::rule("Order total out of range"))?;

            items.push(OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id,
                quantity,
                unit_price_cents: product.price_cents,
                subtotal_cents,
                created_at: now,
            });
        }

        Ok(Self {
            id: order_id,
            user_id,
            status: OrderStatus::Pending,
            total_cents,
            notes: notes
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            delivery_address: delivery_address.trim().to_string(),
            created_at: now,
            updated_at: now,
            items,
        })
    }

    /// Moves the order to `next`
    ///
    /// # Returns
    /// * `Ok(())` - Status updated
    /// * `Err(DomainError::InvalidTransition)` - If the transition is not allowed
    pub fn change_status(&mut self, next: OrderStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Sum of the item subtotals
    pub fn items_total(&self) -> i64 {
        self.items.iter().map(|item| item.subtotal_cents).sum()
    }
}

/// Merges repeated products, keeping first-seen order
fn merge_lines(lines: &[OrderLine]) -> Result<Vec<(Uuid, i32)>, DomainError> {
    let mut merged: Vec<(Uuid, i32)> = Vec::with_capacity(lines.len());

    for line in lines {
        if line.quantity <= 0 {
            return Err(DomainError::rule("Quantity must be greater than zero"));
        }

        match merged.iter_mut().find(|(id, _)| *id == line.product_id) {
            Some((_, quantity)) => {
                *quantity = quantity
                    .checked_add(line.quantity)
                    .ok_or_else(|| DomainError::rule("Quantity out of range"))?;
            }
            None => merged.push((line.product_id, line.quantity)),
        }
    }

    Ok(merged)
}

/// Order counts shown on a customer's dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct OrderSummary {
    pub total: usize,
    pub delivered: usize,
    pub open: usize,
    pub cancelled: usize,
}

impl OrderSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        orders.iter().fold(Self::default(), |mut summary, order| {
            summary.total += 1;
            match order.status {
                OrderStatus::Delivered => summary.delivered += 1,
                OrderStatus::Cancelled => summary.cancelled += 1,
                _ if order.status.is_open() => summary.open += 1,
                _ => {}
            }
            summary
        })
    }
}

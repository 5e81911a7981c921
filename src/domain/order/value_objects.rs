use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents the lifecycle status of an order
///
/// # Status Transitions
/// ```text
/// Pending -> Processing -> Delivered
///    |           |
///    +-----------+---> Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order placed, not yet picked up
    #[serde(rename = "pendente")]
    Pending,
    /// Order being prepared
    #[serde(rename = "processando")]
    Processing,
    /// Order handed to the customer
    #[serde(rename = "entregue")]
    Delivered,
    /// Order cancelled before delivery
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl OrderStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Valid Transitions
    /// - Pending -> Processing
    /// - Processing -> Delivered
    /// - Pending -> Cancelled
    /// - Processing -> Cancelled
    ///
    /// # Example
    /// ```
    /// use pedidos_api::domain::order::OrderStatus;
    ///
    /// assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
    /// assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
    /// ```
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Delivered)
                | (Pending, Cancelled)
                | (Processing, Cancelled)
        )
    }

    /// Still waiting to be delivered
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pendente",
            OrderStatus::Processing => "processando",
            OrderStatus::Delivered => "entregue",
            OrderStatus::Cancelled => "cancelado",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendente" => Ok(OrderStatus::Pending),
            "processando" => Ok(OrderStatus::Processing),
            "entregue" => Ok(OrderStatus::Delivered),
            "cancelado" => Ok(OrderStatus::Cancelled),
            other => Err(format!("Unknown order status: {}", other)),
        }
    }
}

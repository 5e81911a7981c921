// Order domain module
// Contains the order aggregate root, its line items and status lifecycle

#![allow(clippy::module_inception)]

pub mod order;
pub mod service;
pub mod value_objects;

pub use order::{Order, OrderItem, OrderLine, OrderSummary};
pub use service::{OrderService, PlaceOrder};
pub use value_objects::OrderStatus;

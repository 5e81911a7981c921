// Repository traits (ports)
// Implemented by the adapters in crate::infrastructure::repositories

pub mod order_repository;
pub mod product_repository;
pub mod user_repository;

pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use user_repository::{UniqueField, UserRepository};

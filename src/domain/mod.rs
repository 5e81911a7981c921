// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod errors;
pub mod formatting;
pub mod money;
pub mod order;
pub mod product;
pub mod repositories;
pub mod user;
pub mod validation;

pub use errors::DomainError;

// Product domain module
// Catalog entries, their validation and soft-delete lifecycle

#![allow(clippy::module_inception)]

pub mod product;
pub mod service;

pub use product::{Product, ProductDraft, ValidatedProduct};
pub use service::ProductService;

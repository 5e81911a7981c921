//! Pedidos API Library
//!
//! Validation core for an online ordering service (CPF checksum, contact
//! and address rules, integer-cent money) plus the services, repositories
//! and HTTP adapters built around it.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

// User domain module
// Contains the account entity, its value objects and the registration flow

#![allow(clippy::module_inception)]

pub mod service;
pub mod user;
pub mod value_objects;

pub use service::UserService;
pub use user::{User, UserDraft, ValidatedUser, ValidationMode};
pub use value_objects::{Cpf, Email, Phone, Role};

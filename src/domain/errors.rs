use thiserror::Error;

use crate::domain::order::OrderStatus;
use crate::domain::repositories::UniqueField;
use crate::domain::validation::ValidationErrors;

/// Errors produced by domain services
///
/// Field-format failures (`Validation`) and uniqueness failures (`Conflict`)
/// are kept apart: the first is fixed by correcting the input's shape, the
/// second by choosing another value. `Storage` and `Hashing` are the only
/// infrastructure faults.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid data: {0}")]
    Validation(ValidationErrors),

    #[error("{0} already registered")]
    Conflict(UniqueField),

    #[error("{0}")]
    NotFound(String),

    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("{0}")]
    Rule(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn rule(message: impl Into<String>) -> Self {
        Self::Rule(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// True for faults the client cannot fix by changing its request
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Hashing(_))
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

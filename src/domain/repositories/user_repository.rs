use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::user::value_objects::{Email, Role};
use crate::domain::user::User;

/// User attributes that must be unique across accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    Email,
    Cpf,
}

impl UniqueField {
    /// Field name as used in error maps and API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Email => "email",
            UniqueField::Cpf => "cpf",
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Email => write!(f, "Email"),
            UniqueField::Cpf => write!(f, "CPF"),
        }
    }
}

/// Repository trait for User accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn create(&self, user: &User) -> Result<Uuid, DomainError>;

    /// Overwrite profile fields, role and password hash of an existing user
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError>;

    /// All users, newest first
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Change the role of a user; returns false when the user does not exist
    async fn set_role(&self, id: Uuid, role: Role) -> Result<bool, DomainError>;

    /// Whether another user already holds `value` for `field`
    ///
    /// `value` is compared in its persisted form (trimmed email, formatted CPF).
    /// `exclude_id` leaves the record being updated out of the match.
    async fn exists_with_value(
        &self,
        field: UniqueField,
        value: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DomainError>;
}

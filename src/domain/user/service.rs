use std::sync::Arc;
use uuid::Uuid;

use super::user::{User, UserDraft, ValidatedUser, ValidationMode};
use super::value_objects::{Email, Role};
use crate::auth::password::PasswordHasher;
use crate::domain::repositories::{UniqueField, UserRepository};
use crate::domain::DomainError;

/// Registration, profile and authentication flows for accounts
///
/// Every write follows the same order: validate all fields, run the
/// uniqueness guards, hash the password if one was supplied, persist.
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Registers a new customer account
    ///
    /// # Returns
    /// * `Ok(User)` - The stored account
    /// * `Err(DomainError::Validation)` - Every failing field
    /// * `Err(DomainError::Conflict)` - Email or CPF already registered
    pub async fn register(&self, draft: UserDraft) -> Result<User, DomainError> {
        let fields = draft.validate(ValidationMode::Create)?;
        self.ensure_unique(&fields, None).await?;

        let password = fields.password.as_deref().unwrap_or_default();
        let password_hash = self.hasher.hash(password)?;
        let user = User::new(fields, password_hash);

        self.repository.create(&user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    /// Re-validates and stores a user's profile
    ///
    /// The password is replaced only when the draft carries a new one.
    pub async fn update_profile(&self, id: Uuid, draft: UserDraft) -> Result<User, DomainError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User not found: {}", id)))?;

        let fields = draft.validate(ValidationMode::Update)?;
        self.ensure_unique(&fields, Some(id)).await?;

        if let Some(password) = fields.password.as_deref() {
            user.password_hash = self.hasher.hash(password)?;
        }
        user.apply_profile(fields);

        self.repository.update(&user).await?;
        tracing::info!(user_id = %user.id, "User profile updated");

        Ok(user)
    }

    /// Checks email and password
    ///
    /// Unknown emails and wrong passwords yield the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = Email::new(email).map_err(|_| DomainError::InvalidCredentials)?;

        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Rejected login attempt");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn find(&self, id: Uuid) -> Result<User, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User not found: {}", id)))
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    /// Grants or revokes administrator access
    pub async fn set_role(&self, id: Uuid, role: Role) -> Result<(), DomainError> {
        if !self.repository.set_role(id, role).await? {
            return Err(DomainError::not_found(format!("User not found: {}", id)));
        }
        tracing::info!(user_id = %id, role = %role, "User role changed");
        Ok(())
    }

    /// Promotes the account registered under `email` to administrator
    ///
    /// Returns false when no such account exists yet.
    pub async fn promote_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let email = Email::new(email).map_err(|e| DomainError::rule(e.to_string()))?;
        match self.repository.find_by_email(&email).await? {
            Some(user) if user.is_admin() => Ok(true),
            Some(user) => {
                self.set_role(user.id, Role::Admin).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Uniqueness guards for email and CPF
    ///
    /// `exclude_id` is the account being updated, which may keep its own values.
    async fn ensure_unique(
        &self,
        fields: &ValidatedUser,
        exclude_id: Option<Uuid>,
    ) -> Result<(), DomainError> {
        let candidates = [
            (UniqueField::Email, fields.email.as_str().to_string()),
            (UniqueField::Cpf, fields.cpf.formatted()),
        ];

        for (field, value) in candidates {
            if self
                .repository
                .exists_with_value(field, &value, exclude_id)
                .await?
            {
                return Err(DomainError::Conflict(field));
            }
        }

        Ok(())
    }
}

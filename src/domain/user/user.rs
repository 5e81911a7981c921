use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use uuid::Uuid;

use super::value_objects::{Cpf, Email, Phone, Role};
use crate::domain::validation::{
    validate_address, validate_age, validate_name, validate_password, FieldError, RawAge,
    ValidationErrors, MIN_PASSWORD_LENGTH,
};

/// Whether a draft describes a new account or changes to an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Registration: a password must be supplied
    Create,
    /// Profile update: the password is only checked when a new one is supplied
    Update,
}

/// Raw user fields as submitted by a client, before any validation
///
/// Absent fields deserialize as blank so the validators report them.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub cpf: String,
    pub phone: String,
    pub age: RawAge,
    pub address: String,
}

impl fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDraft")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("cpf", &self.cpf)
            .field("phone", &self.phone)
            .field("age", &self.age)
            .field("address", &self.address)
            .finish()
    }
}

impl UserDraft {
    /// Runs every user field validator and collects all failures
    ///
    /// Checks, in order: name, email, CPF, phone, age, address and password
    /// length. A failing field never prevents the remaining ones from being
    /// checked.
    ///
    /// # Returns
    /// * `Ok(ValidatedUser)` - Normalized values (trimmed text, formatted CPF
    ///   and phone, integer age), ready for the uniqueness guards
    /// * `Err(ValidationErrors)` - Every failing field with its message
    ///
    /// # Example
    /// ```
    /// use pedidos_api::domain::user::{UserDraft, ValidationMode};
    /// use pedidos_api::domain::validation::RawAge;
    ///
    /// let draft = UserDraft {
    ///     name: "Maria Souza".to_string(),
    ///     email: "maria@example.com".to_string(),
    ///     password: Some("segredo123".to_string()),
    ///     cpf: "52998224725".to_string(),
    ///     phone: "11987654321".to_string(),
    ///     age: RawAge::Number(30),
    ///     address: "Rua das Flores, 123".to_string(),
    /// };
    ///
    /// let user = draft.validate(ValidationMode::Create).expect("valid user");
    /// assert_eq!(user.cpf.formatted(), "529.982.247-25");
    /// assert_eq!(user.phone.as_str(), "(11) 98765-4321");
    /// ```
    pub fn validate(&self, mode: ValidationMode) -> Result<ValidatedUser, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = errors.check("name", validate_name(&self.name));
        let email = errors.check("email", Email::new(&self.email));
        let cpf = errors.check("cpf", Cpf::parse(&self.cpf));
        let phone = errors.check("phone", Phone::parse(&self.phone));
        let age = errors.check("age", validate_age(&self.age));
        let address = errors.check("address", validate_address(&self.address));
        let password = match (&self.password, mode) {
            (Some(password), _) => errors
                .check("password", validate_password(password))
                .map(|_| Some(password.clone())),
            (None, ValidationMode::Update) => Some(None),
            (None, ValidationMode::Create) => {
                errors.add("password", FieldError::PasswordTooShort(MIN_PASSWORD_LENGTH));
                None
            }
        };

        match (name, email, cpf, phone, age, address, password) {
            (Some(()), Some(email), Some(cpf), Some(phone), Some(age), Some(()), Some(password)) => {
                Ok(ValidatedUser {
                    name: self.name.trim().to_string(),
                    email,
                    cpf,
                    phone,
                    age,
                    address: self.address.trim().to_string(),
                    password,
                })
            }
            _ => Err(errors),
        }
    }
}

/// User fields that passed validation, already normalized for persistence
#[derive(Clone)]
pub struct ValidatedUser {
    pub name: String,
    pub email: Email,
    pub cpf: Cpf,
    pub phone: Phone,
    pub age: i32,
    pub address: String,
    /// Plaintext; only ever handed to the password hasher
    pub password: Option<String>,
}

impl fmt::Debug for ValidatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("cpf", &self.cpf)
            .field("phone", &self.phone)
            .field("age", &self.age)
            .field("address", &self.address)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// A registered account
///
/// Only the bcrypt hash of the password is kept.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub cpf: Cpf,
    pub phone: Phone,
    pub age: i32,
    pub address: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a new customer account from validated fields
    pub fn new(fields: ValidatedUser, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
            password_hash,
            cpf: fields.cpf,
            phone: fields.phone,
            age: fields.age,
            address: fields.address,
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the profile fields; role and password hash are left untouched
    pub fn apply_profile(&mut self, fields: ValidatedUser) {
        self.name = fields.name;
        self.email = fields.email;
        self.cpf = fields.cpf;
        self.phone = fields.phone;
        self.age = fields.age;
        self.address = fields.address;
        self.updated_at = Utc::now();
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

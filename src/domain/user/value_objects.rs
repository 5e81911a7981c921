use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::formatting::{digits_only, format_cpf, format_phone};
use crate::domain::validation::{validate_cpf, validate_email, validate_phone, FieldError};

/// Email value object representing a syntactically valid address
///
/// # Invariants
/// - Surrounding whitespace is trimmed
/// - Matches the `local@domain.tld` pattern enforced by `validate_email`
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use pedidos_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new(" cliente@example.com ").expect("valid email");
    /// assert_eq!(email.as_str(), "cliente@example.com");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, FieldError> {
        let email = email.as_ref();
        validate_email(email)?;
        Ok(Email(email.trim().to_string()))
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// CPF value object holding the 11 checksum-verified digits
///
/// Displayed and persisted in the canonical `ddd.ddd.ddd-dd` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl Cpf {
    /// Parses a CPF with or without punctuation
    ///
    /// # Example
    /// ```
    /// use pedidos_api::domain::user::value_objects::Cpf;
    ///
    /// let cpf = Cpf::parse("52998224725").expect("valid cpf");
    /// assert_eq!(cpf.formatted(), "529.982.247-25");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        validate_cpf(raw)?;
        Ok(Cpf(digits_only(raw)))
    }

    /// The bare 11 digits
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// The `ddd.ddd.ddd-dd` display form
    pub fn formatted(&self) -> String {
        format_cpf(&self.0)
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

/// Phone value object, stored in its formatted display form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone(String);

impl Phone {
    /// Validates the shape of `raw` and keeps the formatted version
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        validate_phone(raw)?;
        Ok(Phone(format_phone(raw.trim())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access level of an account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Customer
    #[default]
    User,
    /// Manages catalog and orders
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email() {
        assert!(Email::new("test@example.com").is_ok());
    }

    #[test]
    fn email_is_trimmed() {
        let email = Email::new("  test@example.com\t").unwrap();
        assert_eq!(email.as_str(), "test@example.com");
    }

    #[test]
    fn invalid_email_no_at_symbol() {
        assert!(Email::new("invalid").is_err());
    }

    #[test]
    fn invalid_email_empty() {
        assert_eq!(Email::new(""), Err(FieldError::Required("Email")));
    }

    #[test]
    fn email_display() {
        let email = Email::new("test@example.com").unwrap();
        assert_eq!(format!("{}", email), "test@example.com");
    }

    #[test]
    fn email_deserialization_validates() {
        let ok: Result<Email, _> = serde_json::from_str("\"a@example.com\"");
        let bad: Result<Email, _> = serde_json::from_str("\"not-an-email\"");

        assert!(ok.is_ok());
        assert!(bad.is_err());
    }

    #[test]
    fn cpf_keeps_digits_and_formats() {
        let cpf = Cpf::parse("529.982.247-25").unwrap();
        assert_eq!(cpf.digits(), "52998224725");
        assert_eq!(cpf.formatted(), "529.982.247-25");
        assert_eq!(cpf.to_string(), "529.982.247-25");
    }

    #[test]
    fn cpf_parse_rejects_checksum_mismatch() {
        assert_eq!(Cpf::parse("123.456.789-00"), Err(FieldError::ChecksumMismatch));
    }

    #[test]
    fn cpf_equality_ignores_input_punctuation() {
        assert_eq!(Cpf::parse("52998224725").unwrap(), Cpf::parse("529.982.247-25").unwrap());
    }

    #[test]
    fn phone_is_stored_formatted() {
        assert_eq!(Phone::parse("11987654321").unwrap().as_str(), "(11) 98765-4321");
        assert_eq!(Phone::parse("(11) 2345-6789").unwrap().as_str(), "(11) 2345-6789");
    }

    #[test]
    fn phone_parse_rejects_bad_format() {
        assert!(Phone::parse("12345").is_err());
    }

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn role_defaults_to_user() {
        assert_eq!(Role::default(), Role::User);
        assert!(!Role::User.is_admin());
        assert!(Role::Admin.is_admin());
    }
}

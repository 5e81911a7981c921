use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;

use super::{
    FieldError, MAX_AGE, MIN_ADDRESS_LENGTH, MIN_AGE, MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH,
};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Optional area code in parentheses, 4-5 digit exchange, 4 digit subscriber
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?[0-9]{2}\)?\s?[0-9]{4,5}-?[0-9]{4}$").expect("valid phone regex")
});

/// ASCII letters, accented Latin-1 letters (without × and ÷) and whitespace
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZÀ-ÖØ-öø-ÿ\s]+$").expect("valid name regex"));

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validates the syntax of an email address
///
/// Only the shape is checked; no DNS or mailbox verification happens here.
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if is_blank(email) {
        return Err(FieldError::Required("Email"));
    }

    if !EMAIL_PATTERN.is_match(email.trim()) {
        return Err(FieldError::InvalidFormat {
            label: "email",
            hint: "",
        });
    }

    Ok(())
}

/// Validates a Brazilian phone number such as `(11) 98765-4321` or `1123456789`
pub fn validate_phone(phone: &str) -> Result<(), FieldError> {
    if is_blank(phone) {
        return Err(FieldError::Required("Phone"));
    }

    if !PHONE_PATTERN.is_match(phone.trim()) {
        return Err(FieldError::InvalidFormat {
            label: "phone",
            hint: ". Use the format (00) 00000-0000",
        });
    }

    Ok(())
}

/// Validates a person's name
///
/// # Example
/// ```
/// use pedidos_api::domain::validation::validate_name;
///
/// assert!(validate_name("João da Silva").is_ok());
/// assert!(validate_name("R2D2").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<(), FieldError> {
    if is_blank(name) {
        return Err(FieldError::Required("Name"));
    }

    if name.trim().chars().count() < MIN_NAME_LENGTH {
        return Err(FieldError::TooShort {
            label: "Name",
            min: MIN_NAME_LENGTH,
        });
    }

    if !NAME_PATTERN.is_match(name) {
        return Err(FieldError::InvalidCharacters);
    }

    Ok(())
}

/// Validates a free-text address; only a minimum length is imposed
pub fn validate_address(address: &str) -> Result<(), FieldError> {
    if is_blank(address) {
        return Err(FieldError::Required("Address"));
    }

    if address.trim().chars().count() < MIN_ADDRESS_LENGTH {
        return Err(FieldError::TooShort {
            label: "Address",
            min: MIN_ADDRESS_LENGTH,
        });
    }

    Ok(())
}

/// Validates the length of a plaintext password
pub fn validate_password(password: &str) -> Result<(), FieldError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FieldError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Age as submitted by a client: a JSON number or the text of a form field
///
/// Any other JSON value (fractions, `null`, booleans) lands in `Other` so the
/// user aggregator can report it next to the remaining field errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAge {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for RawAge {
    fn default() -> Self {
        RawAge::Other(serde_json::Value::Null)
    }
}

impl From<i64> for RawAge {
    fn from(age: i64) -> Self {
        RawAge::Number(age)
    }
}

impl From<&str> for RawAge {
    fn from(age: &str) -> Self {
        RawAge::Text(age.to_string())
    }
}

/// Coerces and range-checks an age, returning the integer value
///
/// # Example
/// ```
/// use pedidos_api::domain::validation::{validate_age, FieldError, RawAge};
///
/// assert_eq!(validate_age(&RawAge::Number(18)), Ok(18));
/// assert_eq!(validate_age(&RawAge::Number(17)), Err(FieldError::BelowMinimum(18)));
/// ```
pub fn validate_age(raw: &RawAge) -> Result<i32, FieldError> {
    let age = match raw {
        RawAge::Number(n) => *n,
        RawAge::Text(text) => parse_age(text)?,
        // Integers past i64 only reach here as u64
        RawAge::Other(serde_json::Value::Number(n)) if n.is_u64() => i64::MAX,
        RawAge::Other(_) => return Err(FieldError::NotANumber),
    };

    if age < MIN_AGE {
        return Err(FieldError::BelowMinimum(MIN_AGE));
    }

    if age > MAX_AGE {
        return Err(FieldError::AboveMaximum(MAX_AGE));
    }

    Ok(age as i32)
}

fn parse_age(text: &str) -> Result<i64, FieldError> {
    match text.trim().parse::<i64>() {
        Ok(age) => Ok(age),
        // Out-of-range integers are still integers; let the range checks classify them
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(i64::MAX),
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => Ok(i64::MIN),
        Err(_) => Err(FieldError::NotANumber),
    }
}

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A single field-level validation failure
///
/// Every variant renders a human-readable message through `Display`, which is
/// what callers show next to the offending form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{label} must be at least {min} characters")]
    TooShort { label: &'static str, min: usize },

    #[error("CPF must have 11 digits, got {0}")]
    InvalidLength(usize),

    #[error("CPF cannot be a single repeated digit")]
    InvalidPattern,

    #[error("CPF check digit does not match")]
    ChecksumMismatch,

    #[error("Invalid {label}{hint}")]
    InvalidFormat {
        label: &'static str,
        hint: &'static str,
    },

    #[error("Name must contain only letters and spaces")]
    InvalidCharacters,

    #[error("Age must be a number")]
    NotANumber,

    #[error("Minimum age is {0}")]
    BelowMinimum(i64),

    #[error("Age cannot be greater than {0}")]
    AboveMaximum(i64),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("{0} cannot be negative")]
    Negative(&'static str),
}

/// All field failures of one entity, keyed by field name
///
/// An aggregator never stops at the first failure: it records every failing
/// field here and only then decides. `into_result` is the single place that
/// turns the map into a verdict, so an `Err` always carries at least one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one field validator, keeping the value on success
    pub fn check<T>(&mut self, field: &'static str, outcome: Result<T, FieldError>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(error) => {
                self.add(field, error);
                None
            }
        }
    }

    /// Adds a failure for `field`; the first failure recorded for a field wins
    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.0.entry(field).or_insert(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    /// Field name to message mapping, as rendered to API clients
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(field, error)| (field.to_string(), error.to_string()))
            .collect()
    }

    /// Turns the collected failures into a verdict
    ///
    /// `value` is only built when no failure was recorded.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, error)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, error) in self.iter() {
            map.serialize_entry(field, &error.to_string())?;
        }
        map.end()
    }
}

// Field validation module
// Pure predicate functions per field type plus the error map the entity
// aggregators collect into

pub mod document;
pub mod errors;
pub mod fields;

pub use document::validate_cpf;
pub use errors::{FieldError, ValidationErrors};
pub use fields::{
    validate_address, validate_age, validate_email, validate_name, validate_password,
    validate_phone, RawAge,
};

/// Minimum age accepted at registration
pub const MIN_AGE: i64 = 18;

/// Maximum plausible age
pub const MAX_AGE: i64 = 150;

/// Minimum trimmed length of a person or product name
pub const MIN_NAME_LENGTH: usize = 3;

/// Minimum trimmed length of a free-text address
pub const MIN_ADDRESS_LENGTH: usize = 10;

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

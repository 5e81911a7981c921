// Authentication primitives: password hashing and bearer tokens

pub mod jwt;
pub mod password;

pub use jwt::{create_token, verify_token, Claims, TokenError};
pub use password::{BcryptHasher, PasswordHasher};

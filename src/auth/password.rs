// Password hashing utilities
// Uses bcrypt (salted, adaptive cost) so plaintext passwords are never stored

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::domain::DomainError;

/// Hashes a password using bcrypt with the given cost
///
/// # Arguments
/// * `password` - The plaintext password to hash
/// * `cost` - bcrypt work factor (4..=31)
///
/// # Returns
/// * `Ok(String)` - The bcrypt hash
/// * `Err(DomainError::Hashing)` - If hashing fails
///
/// # Example
/// ```
/// use pedidos_api::auth::password::hash_password;
///
/// let hash = hash_password("my_password", 4).expect("valid hash");
/// assert!(hash.starts_with("$2"));
/// ```
pub fn hash_password(password: &str, cost: u32) -> Result<String, DomainError> {
    hash(password, cost).map_err(|e| DomainError::Hashing(e.to_string()))
}

/// Verifies a password against a bcrypt hash
///
/// # Returns
/// * `Ok(bool)` - True if password matches, false otherwise
/// * `Err(DomainError::Hashing)` - If the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, DomainError> {
    verify(password, hash).map_err(|e| DomainError::Hashing(e.to_string()))
}

/// Seam used by the user service so tests can run with a cheap cost
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}

/// bcrypt-backed `PasswordHasher`
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        hash_password(password, self.cost)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        verify_password(password, hash)
    }
}

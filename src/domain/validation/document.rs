// CPF (Cadastro de Pessoas Físicas) checksum validation

use super::FieldError;
use crate::domain::formatting::digits_only;

/// Validates a CPF, with or without `ddd.ddd.ddd-dd` punctuation
///
/// # Validation Rules
/// - Exactly 11 digits once punctuation is stripped
/// - Not a single digit repeated 11 times
/// - Both trailing check digits match the weighted mod-11 sums
///
/// # Example
/// ```
/// use pedidos_api::domain::validation::{validate_cpf, FieldError};
///
/// assert!(validate_cpf("529.982.247-25").is_ok());
/// assert_eq!(validate_cpf("111.111.111-11"), Err(FieldError::InvalidPattern));
/// ```
pub fn validate_cpf(raw: &str) -> Result<(), FieldError> {
    let digits: Vec<u32> = digits_only(raw)
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.len() != 11 {
        return Err(FieldError::InvalidLength(digits.len()));
    }

    if digits.iter().all(|&d| d == digits[0]) {
        return Err(FieldError::InvalidPattern);
    }

    if check_digit(&digits[..9]) != digits[9] {
        return Err(FieldError::ChecksumMismatch);
    }

    if check_digit(&digits[..10]) != digits[10] {
        return Err(FieldError::ChecksumMismatch);
    }

    Ok(())
}

/// Check digit over `prefix`, weighting from `len + 1` down to 2
fn check_digit(prefix: &[u32]) -> u32 {
    let top_weight = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top_weight - i as u32))
        .sum();

    match (sum * 10) % 11 {
        10 | 11 => 0,
        rest => rest,
    }
}

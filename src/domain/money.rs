// Monetary amounts in integer minor units (centavos)
// Decimal input goes through rust_decimal; no floating point touches a price

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

/// Currency prefix used when rendering amounts
pub const CURRENCY_PREFIX: &str = "R$";

/// Errors converting between display amounts and minor units
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),

    #[error("Amount out of range: {0}")]
    OutOfRange(Decimal),
}

/// Converts a major-unit amount (reais) to minor units (centavos)
///
/// Rounds half away from zero, so `19.995` becomes `2000` rather than being
/// truncated to `1999`.
///
/// # Example
/// ```
/// use pedidos_api::domain::money::to_cents;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(to_cents(Decimal::from_str("2999.00").unwrap()), Ok(299900));
/// assert_eq!(to_cents(Decimal::from_str("0.015").unwrap()), Ok(2));
/// ```
pub fn to_cents(amount: Decimal) -> Result<i64, MoneyError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|cents| cents.to_i64())
        .ok_or(MoneyError::OutOfRange(amount))
}

/// Converts minor units back to an exact major-unit decimal
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Renders minor units in Brazilian Portuguese notation
///
/// `.` groups thousands and `,` separates the two decimal places.
///
/// # Example
/// ```
/// use pedidos_api::domain::money::format_price;
///
/// assert_eq!(format_price(299900), "R$ 2.999,00");
/// assert_eq!(format_price(8900), "R$ 89,00");
/// ```
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let reais = group_thousands(abs / 100);
    format!("{} {}{},{:02}", CURRENCY_PREFIX, sign, reais, abs % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

/// Parses a displayed or raw amount into minor units
///
/// Accepted shapes:
/// - `R$ 2.999,00` / `2.999,00` / `2999,5`: a comma is the decimal separator
///   and dots group thousands
/// - `2999.00` / `2999`: without a comma the dot is the decimal point
///
/// # Example
/// ```
/// use pedidos_api::domain::money::{format_price, parse_price};
///
/// assert_eq!(parse_price("R$ 2.999,00"), Ok(299900));
/// assert_eq!(parse_price("459.90"), Ok(45990));
/// assert_eq!(parse_price(&format_price(123456789)), Ok(123456789));
/// ```
pub fn parse_price(input: &str) -> Result<i64, MoneyError> {
    let invalid = || MoneyError::InvalidAmount(input.to_string());

    let trimmed = input.trim();
    let unprefixed = trimmed
        .strip_prefix(CURRENCY_PREFIX)
        .unwrap_or(trimmed)
        .trim();

    let normalized = if unprefixed.contains(',') {
        unprefixed.replace('.', "").replace(',', ".")
    } else {
        unprefixed.to_string()
    };

    if normalized.is_empty() || normalized.chars().any(|c| c.is_whitespace()) {
        return Err(invalid());
    }

    let amount = Decimal::from_str(&normalized).map_err(|_| invalid())?;
    to_cents(amount)
}

// Display formatters for document identifiers and phone numbers
// Inputs that do not have the expected digit count are returned unchanged

/// Keeps only the ASCII digits of `raw`
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats a CPF as `ddd.ddd.ddd-dd`
///
/// # Example
/// ```
/// use pedidos_api::domain::formatting::format_cpf;
///
/// assert_eq!(format_cpf("52998224725"), "529.982.247-25");
/// assert_eq!(format_cpf("123"), "123");
/// ```
pub fn format_cpf(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() != 11 {
        return raw.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..]
    )
}

/// Formats a Brazilian phone number
///
/// - 11 digits (mobile): `(dd) ddddd-dddd`
/// - 10 digits (landline): `(dd) dddd-dddd`
///
/// # Example
/// ```
/// use pedidos_api::domain::formatting::format_phone;
///
/// assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
/// assert_eq!(format_phone("1123456789"), "(11) 2345-6789");
/// ```
pub fn format_phone(raw: &str) -> String {
    let digits = digits_only(raw);
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => raw.to_string(),
    }
}

//! Numeric normalization for quantities and prices.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Normalize a locale-ambiguous number to a canonical decimal string.
///
/// Everything except digits, `,` and `.` is dropped. A single comma without a
/// dot is the decimal separator. When both separators occur, the one that
/// comes last is the decimal separator and the other groups thousands.
/// Repeated occurrences of a lone separator kind group thousands.
///
/// The value is never parsed, so the textual precision is preserved. Input
/// without any digit yields an empty string.
pub fn normalize_number(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return String::new();
    }

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    match (commas, dots) {
        (0, 0) | (0, 1) => cleaned,
        (1, 0) => cleaned.replace(',', "."),
        (_, 0) => cleaned.replace(',', ""),
        (0, _) => cleaned.replace('.', ""),
        _ => {
            let comma_pos = cleaned.rfind(',');
            let dot_pos = cleaned.rfind('.');
            match (comma_pos, dot_pos) {
                (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
                _ => cleaned.replace(',', ""),
            }
        }
    }
}

/// Parse a number in any format accepted by [`normalize_number`].
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let normalized = normalize_number(raw);
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}

/// Compare `quantity × unit_price` with `total`, allowing one cent of rounding.
///
/// Returns the computed product when it disagrees with the total. Unparseable
/// input is not reported.
pub fn total_mismatch(quantity: &str, unit_price: &str, total: &str) -> Option<Decimal> {
    let qty = parse_amount(quantity)?;
    let price = parse_amount(unit_price)?;
    let total = parse_amount(total)?;

    let computed = qty * price;
    if (computed - total).abs() > Decimal::new(1, 2) {
        Some(computed)
    } else {
        None
    }
}

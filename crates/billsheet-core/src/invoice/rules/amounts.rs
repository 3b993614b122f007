//! Amount parsing and formatting.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Fraction digits every invoice amount carries.
pub const AMOUNT_SCALE: u32 = 2;

/// Parse a US-formatted amount (e.g., "1,234.56") into a two-digit decimal.
///
/// Returns `None` for anything that is not a non-negative number once the
/// thousands separators are removed.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace(',', "");
    let mut amount = Decimal::from_str(&cleaned).ok()?;
    if amount.is_sign_negative() {
        return None;
    }

    amount.rescale(AMOUNT_SCALE);
    Some(amount)
}

/// Format amount in US style (1,234.56).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return s;
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}.{}", formatted, decimal_part)
}

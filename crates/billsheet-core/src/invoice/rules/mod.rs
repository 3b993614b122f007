//! Rule-based field extractors for the recognized invoice layout.

pub mod amounts;
pub mod patterns;

pub use amounts::{format_amount, parse_amount};
pub use patterns::*;

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// Extracts the value group of one of the fixed line patterns.
///
/// A line that matches with an empty value counts as no match.
#[derive(Debug, Clone, Copy)]
pub struct LineField {
    name: &'static str,
    pattern: &'static Regex,
}

impl LineField {
    pub const fn new(name: &'static str, pattern: &'static Regex) -> Self {
        Self { name, pattern }
    }

    /// Field name used in log lines.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the pattern occurs anywhere on the page.
    pub fn is_present(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl FieldExtractor for LineField {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = self.pattern.captures(text)?;
        let value = caps.get(VALUE_GROUP)?.as_str();
        (!value.is_empty()).then(|| value.to_string())
    }
}

/// Anchor line identifying an invoice page.
pub fn anchor() -> LineField {
    LineField::new("anchor", &COMPANY_ANCHOR)
}

pub fn invoice_number() -> LineField {
    LineField::new("invoice_number", &INVOICE_NUMBER)
}

pub fn reference_number() -> LineField {
    LineField::new("reference_number", &REFERENCE_NUMBER)
}

pub fn debtor_name() -> LineField {
    LineField::new("debtor_name", &DEBTOR_NAME)
}

/// Invoice total; the only field looked up on the following page as well.
pub fn total_charges() -> LineField {
    LineField::new("total_charges", &TOTAL_CHARGES)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "Remit to:\n\
        C/O Orange Commercial Credit\n\
        Invoice Number 104233-0-B Print Date\n\
        REF #1: PO 55-1/A\n\
        Bill To: Lakeside Produce (WA)\n\
        Total Charges: $ US   2,050.75\n";

    #[test]
    fn test_extract_each_field() {
        assert!(anchor().is_present(PAGE));
        assert_eq!(invoice_number().extract(PAGE).unwrap(), "104233-0-B");
        assert_eq!(reference_number().extract(PAGE).unwrap(), "PO 55-1/A");
        assert_eq!(debtor_name().extract(PAGE).unwrap(), "Lakeside Produce (WA)");
        assert_eq!(total_charges().extract(PAGE).unwrap(), "2,050.75");
    }

    #[test]
    fn test_patterns_require_whole_line() {
        let text = "Note: C/O Orange Commercial Credit\n\
            Total Charges: $ US 10.00 (partial)\n";

        assert!(!anchor().is_present(text));
        assert!(total_charges().extract(text).is_none());
    }

    #[test]
    fn test_amount_pattern_limits() {
        assert_eq!(
            total_charges().extract("Total Charges: $ US 999.00").unwrap(),
            "999.00"
        );
        assert!(total_charges().extract("Total Charges: $ US 12,345.00").is_none());
        assert!(total_charges().extract("Total Charges: $ US 12.5").is_none());
    }

    #[test]
    fn test_empty_debtor_is_no_match() {
        assert!(debtor_name().extract("Bill To: \n").is_none());
    }
}

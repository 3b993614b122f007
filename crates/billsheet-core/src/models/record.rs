//! Invoice record extracted from one matched page.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One invoice row of the output sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice number, e.g. `123456-1-A`.
    pub invoice_number: String,

    /// Reference number (`REF #1`), empty when the page has none.
    #[serde(default)]
    pub reference_number: String,

    /// Debtor (`Bill To`) name, empty when the page has none.
    #[serde(default)]
    pub debtor_name: String,

    /// Invoice total with two fraction digits.
    pub amount: Decimal,

    /// 1-indexed page whose anchor produced this record.
    pub page: u32,
}

impl InvoiceRecord {
    /// Text values for the sheet's string columns, in column order.
    pub fn text_fields(&self) -> [&str; 3] {
        [&self.invoice_number, &self.reference_number, &self.debtor_name]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_record_serializes_amount_as_string() {
        let record = InvoiceRecord {
            invoice_number: "123456-1-A".to_string(),
            reference_number: String::new(),
            debtor_name: "ACME (US)".to_string(),
            amount: Decimal::from_str("1234.50").unwrap(),
            page: 3,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["amount"], "1234.50");
        assert_eq!(json["page"], 3);

        let back: InvoiceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}

//! Page scanner pulling invoice records out of an ordered page sequence.

use rust_decimal::Decimal;
use tracing::{debug, info, trace, warn};

use crate::error::ExtractionError;
use crate::models::config::MissingAmountPolicy;
use crate::models::record::InvoiceRecord;

use super::accumulator::RecordAccumulator;
use super::rules::{self, parse_amount, FieldExtractor};
use super::Result;

/// Raw fields found on a page carrying the invoice anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFields {
    pub invoice_number: Option<String>,
    pub reference_number: Option<String>,
    pub debtor_name: Option<String>,
    pub amount: Option<String>,
}

impl PageFields {
    /// Extract all four fields, or `None` if the page is not an invoice page.
    pub fn extract(text: &str) -> Option<Self> {
        if !rules::anchor().is_present(text) {
            return None;
        }

        Some(Self {
            invoice_number: rules::invoice_number().extract(text),
            reference_number: rules::reference_number().extract(text),
            debtor_name: rules::debtor_name().extract(text),
            amount: rules::total_charges().extract(text),
        })
    }
}

/// Scans pages for invoices.
///
/// Each page is tested for the anchor line. A page without it is skipped. On
/// an anchored page the four fields are extracted independently; when the
/// amount is missing and an invoice number was found, the next page is
/// consumed and searched for the amount only, and scanning resumes after it.
/// Records come out in the order their pages were matched.
#[derive(Debug, Clone, Default)]
pub struct InvoiceScanner {
    missing_amount: MissingAmountPolicy,
}

impl InvoiceScanner {
    /// Create a scanner that skips invoices without an amount.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how an invoice with no amount on its page or the next is handled.
    pub fn with_missing_amount_policy(mut self, policy: MissingAmountPolicy) -> Self {
        self.missing_amount = policy;
        self
    }

    /// Scan an ordered page sequence.
    ///
    /// Fails on the first amount that is not numeric; no partial record set
    /// is returned.
    pub fn scan<S: AsRef<str>>(&self, pages: &[S]) -> Result<Vec<InvoiceRecord>> {
        let mut records = RecordAccumulator::new();
        let mut pages = pages.iter().map(|p| p.as_ref()).zip(1u32..);

        while let Some((text, page)) = pages.next() {
            let Some(fields) = PageFields::extract(text) else {
                continue;
            };

            debug!(
                "{}: invoice={:?} ref={:?} debtor={:?} amount={:?}",
                page, fields.invoice_number, fields.reference_number, fields.debtor_name, fields.amount
            );

            let Some(invoice_number) = fields.invoice_number else {
                debug!("Page {} has the anchor but no invoice number", page);
                continue;
            };

            let amount_text = match fields.amount {
                Some(amount) => Some(amount),
                None => pages.next().and_then(|(next_text, next_page)| {
                    let field = rules::total_charges();
                    trace!("Looking for {} of page {} on page {}", field.name(), page, next_page);
                    field.extract(next_text)
                }),
            };

            let Some(amount_text) = amount_text else {
                match self.missing_amount {
                    MissingAmountPolicy::Skip => {
                        warn!("No amount found for invoice {} on page {}, skipping", invoice_number, page);
                        continue;
                    }
                    MissingAmountPolicy::Fail => {
                        return Err(ExtractionError::MissingAmount { page, invoice_number });
                    }
                }
            };

            let amount = parse_page_amount(page, &amount_text)?;
            records.push(InvoiceRecord {
                invoice_number,
                reference_number: fields.reference_number.unwrap_or_default(),
                debtor_name: fields.debtor_name.unwrap_or_default(),
                amount,
                page,
            });
        }

        info!("Extracted {} invoices totaling {}", records.len(), records.total());
        Ok(records.into_records())
    }
}

fn parse_page_amount(page: u32, text: &str) -> Result<Decimal> {
    parse_amount(text).ok_or_else(|| ExtractionError::NumericParse {
        page,
        value: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn invoice_page(number: Option<&str>, reference: Option<&str>, debtor: Option<&str>, amount: Option<&str>) -> String {
        let mut page = String::from("ORANGE COMMERCIAL CREDIT\nC/O Orange Commercial Credit\n");
        if let Some(number) = number {
            page.push_str(&format!("Invoice Number {} Print Date\n", number));
        }
        if let Some(reference) = reference {
            page.push_str(&format!("REF #1: {}\n", reference));
        }
        if let Some(debtor) = debtor {
            page.push_str(&format!("Bill To: {}\n", debtor));
        }
        if let Some(amount) = amount {
            page.push_str(&format!("Total Charges: $ US   {}\n", amount));
        }
        page
    }

    fn continuation_page(amount: &str) -> String {
        format!("Line items continued\nTotal Charges: $ US {}\n", amount)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_scan_all_fields_present() {
        let pages = vec![
            invoice_page(Some("100001-1-A"), Some("PO-1"), Some("Acme Foods"), Some("1,234.56")),
            invoice_page(Some("100002-1-B"), Some("PO-2"), Some("Bay Market"), Some("12.00")),
            invoice_page(Some("100003-2-C"), Some("PO-3"), Some("Corner Deli"), Some("0.99")),
        ];

        let records = InvoiceScanner::new().scan(&pages).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].invoice_number, "100001-1-A");
        assert_eq!(records[0].reference_number, "PO-1");
        assert_eq!(records[0].debtor_name, "Acme Foods");
        assert_eq!(records[0].amount, dec("1234.56"));
        assert_eq!(records[1].amount.to_string(), "12.00");
        assert_eq!(records[2].page, 3);
    }

    #[test]
    fn test_non_invoice_pages_are_skipped_and_order_kept() {
        let pages = vec![
            "Cover letter".to_string(),
            invoice_page(Some("300000-0-Z"), None, None, Some("5.00")),
            "Terms and conditions".to_string(),
            invoice_page(Some("100000-0-A"), None, None, Some("6.00")),
        ];

        let records = InvoiceScanner::new().scan(&pages).unwrap();

        let numbers: Vec<&str> = records.iter().map(|r| r.invoice_number.as_str()).collect();
        assert_eq!(numbers, vec!["300000-0-Z", "100000-0-A"]);
        let pages: Vec<u32> = records.iter().map(|r| r.page).collect();
        assert_eq!(pages, vec![2, 4]);
    }

    #[test]
    fn test_missing_reference_and_debtor_become_empty() {
        let pages = vec![invoice_page(Some("555555-5-5"), None, None, Some("10.00"))];

        let records = InvoiceScanner::new().scan(&pages).unwrap();

        assert_eq!(records[0].reference_number, "");
        assert_eq!(records[0].debtor_name, "");
    }

    #[test]
    fn test_amount_taken_from_next_page() {
        let pages = vec![
            invoice_page(Some("200001-0-A"), Some("R-9"), Some("Delta Farms"), None),
            continuation_page("2,500.10"),
            invoice_page(Some("200002-0-A"), None, None, Some("3.00")),
        ];

        let records = InvoiceScanner::new().scan(&pages).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].invoice_number, "200001-0-A");
        assert_eq!(records[0].amount, dec("2500.10"));
        assert_eq!(records[0].page, 1);
        assert_eq!(records[1].invoice_number, "200002-0-A");
    }

    #[test]
    fn test_continuation_page_is_consumed_even_if_anchored() {
        // The second page is only searched for the amount.
        let pages = vec![
            invoice_page(Some("200001-0-A"), None, None, None),
            invoice_page(Some("200009-0-A"), None, None, Some("8.00")),
        ];

        let records = InvoiceScanner::new().scan(&pages).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].invoice_number, "200001-0-A");
        assert_eq!(records[0].amount, dec("8.00"));
    }

    #[test]
    fn test_lookahead_is_single_page() {
        let pages = vec![
            invoice_page(Some("200001-0-A"), None, None, None),
            "no totals here".to_string(),
            continuation_page("9.00"),
        ];

        let records = InvoiceScanner::new().scan(&pages).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_anchor_without_invoice_number_emits_nothing() {
        let pages = vec![
            invoice_page(None, Some("PO-1"), Some("Acme"), None),
            invoice_page(Some("400000-0-A"), None, None, Some("1.00")),
        ];

        let records = InvoiceScanner::new().scan(&pages).unwrap();

        // The page without an invoice number does not consume its successor.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].invoice_number, "400000-0-A");
    }

    #[test]
    fn test_missing_amount_skip_policy() {
        let pages = vec![
            invoice_page(Some("600000-0-A"), None, None, Some("1.00")),
            invoice_page(Some("600001-0-A"), None, None, None),
        ];

        let records = InvoiceScanner::new().scan(&pages).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].invoice_number, "600000-0-A");
    }

    #[test]
    fn test_missing_amount_fail_policy() {
        let pages = vec![
            invoice_page(Some("600000-0-A"), None, None, Some("1.00")),
            invoice_page(Some("600001-0-A"), None, None, None),
        ];

        let err = InvoiceScanner::new()
            .with_missing_amount_policy(MissingAmountPolicy::Fail)
            .scan(&pages)
            .unwrap_err();

        assert_eq!(
            err,
            ExtractionError::MissingAmount {
                page: 2,
                invoice_number: "600001-0-A".to_string(),
            }
        );
    }

    #[test]
    fn test_non_numeric_amount_is_parse_error() {
        assert_eq!(parse_page_amount(4, "1,234.56").unwrap(), dec("1234.56"));
        assert_eq!(
            parse_page_amount(4, "1.2.3").unwrap_err(),
            ExtractionError::NumericParse {
                page: 4,
                value: "1.2.3".to_string(),
            }
        );
    }

    #[test]
    fn test_page_fields_without_anchor() {
        let text = "Invoice Number 100001-1-A Print Date\nTotal Charges: $ US 1.00\n";
        assert_eq!(PageFields::extract(text), None);
    }

    #[test]
    fn test_scan_empty_input() {
        let pages: Vec<String> = Vec::new();
        assert!(InvoiceScanner::new().scan(&pages).unwrap().is_empty());
    }
}

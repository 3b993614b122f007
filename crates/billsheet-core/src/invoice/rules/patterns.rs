//! Line patterns for the Orange Commercial Credit invoice layout.
//!
//! Every pattern runs in multi-line mode and must match a whole line. The
//! field value is capture group 2.

use lazy_static::lazy_static;
use regex::Regex;

/// Capture group holding the field value in every pattern below.
pub const VALUE_GROUP: usize = 2;

lazy_static! {
    // Page anchor: only pages carrying this line are invoice pages
    pub static ref COMPANY_ANCHOR: Regex = Regex::new(
        r"(?m)^((C/O Orange Commercial Credit))$"
    ).unwrap();

    // Invoice number, e.g. "Invoice Number 123456-1-A Print Date"
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?m)^(Invoice\sNumber\s(\d{6}-\d-\w)\sPrint\sDate)$"
    ).unwrap();

    // Customer reference, up to 25 characters
    pub static ref REFERENCE_NUMBER: Regex = Regex::new(
        r"(?m)^(REF #1: ([a-zA-Z0-9\-./ ]{1,25}))$"
    ).unwrap();

    pub static ref DEBTOR_NAME: Regex = Regex::new(
        r"(?m)^(Bill To: ([-\w/() ]*))$"
    ).unwrap();

    // Invoice total in USD, thousands separated by commas
    pub static ref TOTAL_CHARGES: Regex = Regex::new(
        r"(?m)^(Total Charges: \$ US\s*((\d{1,3}|\d{1},\d{3})\.\d{2}))$"
    ).unwrap();
}

//! Ordered collection of extracted invoice records.

use rust_decimal::Decimal;

use crate::models::record::InvoiceRecord;

/// Append-only record list kept in the order pages were matched.
#[derive(Debug, Clone, Default)]
pub struct RecordAccumulator {
    records: Vec<InvoiceRecord>,
}

impl RecordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: InvoiceRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InvoiceRecord> {
        self.records.iter()
    }

    /// Sum of all accumulated amounts.
    pub fn total(&self) -> Decimal {
        self.records.iter().map(|r| r.amount).sum()
    }

    pub fn into_records(self) -> Vec<InvoiceRecord> {
        self.records
    }
}

impl From<Vec<InvoiceRecord>> for RecordAccumulator {
    fn from(records: Vec<InvoiceRecord>) -> Self {
        Self { records }
    }
}

//! Invoice page scanning and field extraction.

pub mod accumulator;
pub mod rules;
mod scanner;

pub use accumulator::RecordAccumulator;
pub use scanner::{InvoiceScanner, PageFields};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

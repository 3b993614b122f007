//! Data models and configuration.

pub mod config;
pub mod record;

pub use config::{BillsheetConfig, ExtractionConfig, MissingAmountPolicy, OutputConfig, TemplateConfig};
pub use record::InvoiceRecord;

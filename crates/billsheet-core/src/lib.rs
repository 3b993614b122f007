//! Core library for invoice batch conversion.
//!
//! This crate provides:
//! - PDF page text extraction
//! - Invoice page scanning with next-page amount lookup
//! - Layout of the records into the fixed summary spreadsheet template
//! - A conversion pipeline tying the three together

pub mod convert;
pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod sheet;

pub use convert::{output_file_name, Conversion, ConversionOutput, Converter};
pub use error::{BillsheetError, ExtractionError, LayoutError, PdfError, Result};
pub use invoice::{InvoiceScanner, RecordAccumulator};
pub use models::{BillsheetConfig, InvoiceRecord, MissingAmountPolicy};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use sheet::{LayoutPlan, RenderedWorkbook, TemplateLayoutEngine};

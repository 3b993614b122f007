//! Error types for the billsheet-core library.

use thiserror::Error;

/// Main error type for the billsheet library.
#[derive(Error, Debug)]
pub enum BillsheetError {
    /// The source document could not be opened or read.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Spreadsheet template layout error.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a document into page texts.
///
/// Any of these means the document could not be opened; the scanner never
/// sees partial page data.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to open PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised by the page scanner.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    /// An amount field matched but is not a number once separators are removed.
    #[error("page {page}: amount {value:?} is not numeric")]
    NumericParse { page: u32, value: String },

    /// A matched invoice has no amount on its page or the following one.
    #[error("page {page}: no amount found for invoice {invoice_number}")]
    MissingAmount { page: u32, invoice_number: String },
}

/// Errors raised while rendering records into the template.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The layout engine was asked to render zero records.
    #[error("no records to render")]
    EmptyRecords,

    /// The record count does not fit the sheet's row range.
    #[error("too many records for the template: {0}")]
    TooManyRecords(usize),

    /// The template workbook could not be loaded.
    #[error("failed to load template: {0}")]
    Template(String),

    /// The rendered workbook could not be written.
    #[error("failed to save workbook: {0}")]
    Save(String),

    /// An amount could not be represented as a sheet number.
    #[error("amount {0} cannot be written as a number")]
    Amount(String),
}

/// Result type for the billsheet library.
pub type Result<T> = std::result::Result<T, BillsheetError>;

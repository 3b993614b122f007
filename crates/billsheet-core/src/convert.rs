//! One conversion run: page texts to records to an output workbook.

use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::invoice::InvoiceScanner;
use crate::models::config::BillsheetConfig;
use crate::models::record::InvoiceRecord;
use crate::pdf::PdfExtractor;
use crate::sheet::{RenderedWorkbook, TemplateLayoutEngine};

/// Stem used when an input name has nothing left after sanitizing.
const FALLBACK_STEM: &str = "invoices";

/// Timestamp prefix format for output names.
const TIMESTAMP_FORMAT: &str = "%m_%d_%Y-%H%M%S-";

/// What a conversion produces.
pub enum ConversionOutput {
    /// Records rendered into the template.
    Workbook(RenderedWorkbook),
    /// No invoices found; the pre-built empty workbook stands in.
    Empty,
}

/// Records of one run with the output they produced.
pub struct Conversion {
    pub records: Vec<InvoiceRecord>,
    pub output: ConversionOutput,
}

impl Conversion {
    pub fn is_empty(&self) -> bool {
        matches!(self.output, ConversionOutput::Empty)
    }
}

/// Runs conversions with a fixed configuration.
///
/// Every run loads its own copy of the template; nothing is shared between
/// runs.
pub struct Converter {
    config: BillsheetConfig,
    scanner: InvoiceScanner,
}

impl Converter {
    pub fn new(config: BillsheetConfig) -> Self {
        let scanner =
            InvoiceScanner::new().with_missing_amount_policy(config.extraction.missing_amount);
        Self { config, scanner }
    }

    pub fn config(&self) -> &BillsheetConfig {
        &self.config
    }

    /// Scan page texts for invoice records.
    pub fn extract_pages<S: AsRef<str>>(&self, pages: &[S]) -> Result<Vec<InvoiceRecord>> {
        Ok(self.scanner.scan(pages)?)
    }

    /// Read a PDF and scan its pages for invoice records.
    pub fn extract_pdf(&self, data: &[u8]) -> Result<Vec<InvoiceRecord>> {
        let pages = PdfExtractor::pages_from_bytes(data)?;
        debug!("Scanning {} pages", pages.len());
        self.extract_pages(&pages)
    }

    /// Render records into a fresh copy of the template.
    ///
    /// Zero records never reach the layout engine.
    pub fn render(&self, records: &[InvoiceRecord]) -> Result<ConversionOutput> {
        if records.is_empty() {
            info!("No invoices found, using the empty workbook");
            return Ok(ConversionOutput::Empty);
        }

        let engine = TemplateLayoutEngine::load(&self.config.template.template_path)?;
        Ok(ConversionOutput::Workbook(engine.render(records)?))
    }

    /// Run the whole pipeline on page texts.
    pub fn convert_pages<S: AsRef<str>>(&self, pages: &[S]) -> Result<Conversion> {
        let records = self.extract_pages(pages)?;
        let output = self.render(&records)?;
        Ok(Conversion { records, output })
    }

    /// Run the whole pipeline on a PDF.
    pub fn convert_pdf(&self, data: &[u8]) -> Result<Conversion> {
        let records = self.extract_pdf(data)?;
        let output = self.render(&records)?;
        Ok(Conversion { records, output })
    }

    /// Write a conversion output to `dest`.
    pub fn write_output(&self, output: &ConversionOutput, dest: &Path) -> Result<()> {
        match output {
            ConversionOutput::Workbook(workbook) => workbook.save(dest)?,
            ConversionOutput::Empty => {
                std::fs::copy(&self.config.template.empty_template_path, dest)?;
                info!("Copied empty workbook to {}", dest.display());
            }
        }
        Ok(())
    }
}

/// Derive the output workbook name for an input document name.
///
/// The name is sanitized, optionally prefixed with `timestamp`, and a
/// trailing `.pdf` is swapped for `.xlsx`.
pub fn output_file_name(input: &str, timestamp: Option<NaiveDateTime>) -> String {
    let base = Path::new(input)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(input);

    let stamped = match timestamp {
        Some(ts) => format!("{}{}", ts.format(TIMESTAMP_FORMAT), base),
        None => base.to_string(),
    };

    let mut name = secure_filename(&stamped);
    if name.to_ascii_lowercase().ends_with(".pdf") {
        name.truncate(name.len() - ".pdf".len());
    }
    if name.is_empty() {
        name = FALLBACK_STEM.to_string();
    }

    format!("{}.xlsx", name)
}

/// Reduce a file name to `[A-Za-z0-9_.-]`, with whitespace runs as `_`.
///
/// Accented letters keep their base letter (NFKD, then combining marks are
/// dropped with the rest of the non-ASCII text).
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    ascii
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

//! Per-page text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// A document opened for text extraction.
struct LoadedPdf {
    page_count: u32,
    /// Plain (decrypted) bytes handed to pdf-extract.
    bytes: Vec<u8>,
}

/// Page text extractor.
///
/// lopdf validates the document and removes empty-password encryption;
/// pdf-extract then reads the text of each page in order.
#[derive(Default)]
pub struct PdfExtractor {
    loaded: Option<LoadedPdf>,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `data` and return its page texts.
    pub fn pages_from_bytes(data: &[u8]) -> Result<Vec<String>> {
        let mut extractor = Self::new();
        extractor.load(data)?;
        extractor.extract_pages()
    }

    fn decrypted_bytes(doc: &mut Document) -> Result<Vec<u8>> {
        doc.decrypt("").map_err(|_| PdfError::Encrypted)?;
        debug!("Decrypted PDF with empty password");

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
        Ok(bytes)
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let bytes = if doc.is_encrypted() {
            Self::decrypted_bytes(&mut doc)?
        } else {
            data.to_vec()
        };

        debug!("Loaded PDF with {} pages", page_count);
        self.loaded = Some(LoadedPdf { page_count, bytes });
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.loaded.as_ref().map_or(0, |pdf| pdf.page_count)
    }

    fn extract_pages(&self) -> Result<Vec<String>> {
        let pdf = self
            .loaded
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))?;

        let pages = pdf_extract::extract_text_from_mem_by_pages(&pdf.bytes)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        if pages.len() != pdf.page_count as usize {
            warn!(
                "Text extraction returned {} pages for a {} page document",
                pages.len(),
                pdf.page_count
            );
        }

        Ok(pages.iter().map(|text| normalize_lines(text)).collect())
    }
}

/// Trim every line; the field patterns match whole lines.
fn normalize_lines(text: &str) -> String {
    text.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}

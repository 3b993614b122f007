//! Configuration structures for the conversion pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BillsheetError, Result};

/// Main configuration for the billsheet pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillsheetConfig {
    /// Spreadsheet template locations.
    pub template: TemplateConfig,

    /// Output file placement and naming.
    pub output: OutputConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Spreadsheet template locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template the records are rendered into.
    pub template_path: PathBuf,

    /// Pre-built workbook returned when a document has no invoices.
    pub empty_template_path: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("template.xlsx"),
            empty_template_path: PathBuf::from("xlsx").join("empty.xlsx"),
        }
    }
}

/// Output file placement and naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory converted workbooks are written to.
    pub output_dir: PathBuf,

    /// Prefix output names with the conversion time.
    pub timestamp_prefix: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("uploads"),
            timestamp_prefix: false,
        }
    }
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// What to do with a matched invoice whose amount is on neither its page nor the next.
    pub missing_amount: MissingAmountPolicy,
}

/// Handling of a matched invoice without any amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingAmountPolicy {
    /// Drop the page and keep scanning.
    #[default]
    Skip,
    /// Abort the whole scan.
    Fail,
}

impl BillsheetConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| BillsheetError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| BillsheetError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: BillsheetConfig =
            serde_json::from_str(r#"{"extraction": {"missing_amount": "fail"}}"#).unwrap();

        assert_eq!(config.extraction.missing_amount, MissingAmountPolicy::Fail);
        assert_eq!(config.template, TemplateConfig::default());
        assert_eq!(config.output.output_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = BillsheetConfig::default();
        config.output.timestamp_prefix = true;
        config.template.template_path = PathBuf::from("/srv/templates/batch.xlsx");
        config.save(&path).unwrap();

        assert_eq!(BillsheetConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = BillsheetConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, BillsheetError::Config(_)));

        let missing = BillsheetConfig::from_file(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(BillsheetError::Io(_))));
    }
}

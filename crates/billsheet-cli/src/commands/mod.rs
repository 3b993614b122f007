pub mod batch;
pub mod config;
pub mod convert;
pub mod extract;

use std::path::{Path, PathBuf};

use billsheet_core::models::config::BillsheetConfig;

/// Load the configuration given with `--config`, else the default file if
/// it exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BillsheetConfig> {
    if let Some(path) = config_path {
        return Ok(BillsheetConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(BillsheetConfig::from_file(&default_path)?)
    } else {
        Ok(BillsheetConfig::default())
    }
}

/// Reject inputs without a `.pdf` extension.
pub fn ensure_pdf(path: &Path) -> anyhow::Result<()> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if !is_pdf {
        anyhow::bail!("Not a PDF extension: {}", path.display());
    }
    Ok(())
}

/// Output directory from the command line, else from the configuration.
pub fn output_dir(arg: Option<&PathBuf>, config: &BillsheetConfig) -> PathBuf {
    arg.cloned().unwrap_or_else(|| config.output.output_dir.clone())
}

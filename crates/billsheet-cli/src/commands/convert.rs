//! Convert command - render one invoice batch PDF into a workbook.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use billsheet_core::invoice::rules::format_amount;
use billsheet_core::{output_file_name, Converter, RecordAccumulator};

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Input invoice batch PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output directory (default: from config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Prefix the output name with the current time
    #[arg(long)]
    timestamp: bool,
}

/// Outcome of converting one file.
pub struct ConvertOutcome {
    pub output_path: PathBuf,
    pub record_count: usize,
    pub total: String,
}

pub fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    super::ensure_pdf(&args.input)?;
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let converter = Converter::new(config);
    let output_dir = super::output_dir(args.output_dir.as_ref(), converter.config());
    let timestamp = args.timestamp || converter.config().output.timestamp_prefix;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Converting {}", args.input.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let outcome = convert_file(&converter, &args.input, &output_dir, timestamp);
    pb.finish_and_clear();
    let outcome = outcome?;

    if outcome.record_count == 0 {
        println!(
            "{} No invoices found, wrote empty workbook to {}",
            style("ℹ").blue(),
            outcome.output_path.display()
        );
    } else {
        println!(
            "{} Output written to {}",
            style("✓").green(),
            outcome.output_path.display()
        );
        println!(
            "   {} invoices, total {}",
            style(outcome.record_count).green(),
            outcome.total
        );
    }
    debug!("Conversion took {:?}", start.elapsed());

    Ok(())
}

/// Convert `input` and write the workbook into `output_dir`.
pub fn convert_file(
    converter: &Converter,
    input: &Path,
    output_dir: &Path,
    timestamp: bool,
) -> anyhow::Result<ConvertOutcome> {
    info!("Processing file: {}", input.display());
    let data = fs::read(input)?;
    let conversion = converter.convert_pdf(&data)?;

    let input_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let stamp = timestamp.then(|| chrono::Local::now().naive_local());
    let output_path = output_dir.join(output_file_name(input_name, stamp));

    fs::create_dir_all(output_dir)?;
    converter.write_output(&conversion.output, &output_path)?;

    let records = RecordAccumulator::from(conversion.records);
    Ok(ConvertOutcome {
        output_path,
        record_count: records.len(),
        total: format_amount(records.total()),
    })
}


//! Batch command - convert multiple invoice batch PDFs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use billsheet_core::Converter;

use super::convert::{convert_file, ConvertOutcome};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the input PDFs
    #[arg(required = true)]
    input: String,

    /// Output directory (default: from config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Prefix output names with the current time
    #[arg(long)]
    timestamp: bool,

    /// Also write a summary CSV into the output directory
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of converting a single file.
struct BatchResult {
    path: PathBuf,
    outcome: Result<ConvertOutcome, String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| super::ensure_pdf(p).is_ok())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let converter = Converter::new(config);
    let output_dir = super::output_dir(args.output_dir.as_ref(), converter.config());
    let timestamp = args.timestamp || converter.config().output.timestamp_prefix;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = convert_file(&converter, &path, &output_dir, timestamp);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        let outcome = match outcome {
            Ok(outcome) => Ok(outcome),
            Err(e) if args.continue_on_error => {
                warn!("Failed to process {}: {}", path.display(), e);
                Err(e.to_string())
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", path.display(), e);
            }
        };

        results.push(BatchResult {
            path,
            outcome,
            processing_time_ms,
        });
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();
    let successful = results.len() - failed.len();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(e) = &result.outcome {
                println!("  - {}: {}", result.path.display(), e);
            }
        }
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[BatchResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "output",
        "invoices",
        "total",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = result.processing_time_ms.to_string();

        match &result.outcome {
            Ok(outcome) => wtr.write_record([
                filename,
                "success",
                &outcome.output_path.display().to_string(),
                &outcome.record_count.to_string(),
                &outcome.total,
                &time,
                "",
            ])?,
            Err(e) => wtr.write_record([filename, "error", "", "", "", &time, e])?,
        }
    }

    wtr.flush()?;
    Ok(())
}

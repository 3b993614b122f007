//! Extract command - list the invoices found in a PDF without rendering.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use billsheet_core::invoice::rules::format_amount;
use billsheet_core::{Converter, InvoiceRecord, RecordAccumulator};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input invoice batch PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    super::ensure_pdf(&args.input)?;
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Extracting invoices from {}", args.input.display());
    let converter = Converter::new(config);
    let data = fs::read(&args.input)?;
    let records = converter.extract_pdf(&data)?;

    let output = format_records(&records, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} invoices written to {}",
            style("✓").green(),
            records.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn format_records(records: &[InvoiceRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)? + "\n"),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[InvoiceRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    // serialize() only emits the header together with the first record.
    if records.is_empty() {
        wtr.write_record(["invoice_number", "reference_number", "debtor_name", "amount", "page"])?;
    }
    for record in records {
        wtr.serialize(record)?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(records: &[InvoiceRecord]) -> String {
    let mut out = String::new();

    for record in records {
        out.push_str(&format!(
            "{:>4}  {:<14} {:<18} {:<32} {:>14}\n",
            record.page,
            record.invoice_number,
            record.reference_number,
            record.debtor_name,
            format_amount(record.amount)
        ));
    }

    let summary = RecordAccumulator::from(records.to_vec());
    out.push_str(&format!(
        "{} invoices, total {}\n",
        summary.len(),
        format_amount(summary.total())
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use billsheet_core::invoice::rules::parse_amount;

    fn sample() -> Vec<InvoiceRecord> {
        vec![InvoiceRecord {
            invoice_number: "100001-0-A".to_string(),
            reference_number: "PO 7".to_string(),
            debtor_name: "Acme, Inc".to_string(),
            amount: parse_amount("1234.50").unwrap(),
            page: 3,
        }]
    }

    #[test]
    fn test_csv_quotes_commas() {
        let csv = format_csv(&sample()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("invoice_number,reference_number,debtor_name,amount,page")
        );
        assert_eq!(lines.next(), Some("100001-0-A,PO 7,\"Acme, Inc\",1234.50,3"));
    }

    #[test]
    fn test_csv_empty_has_header() {
        let csv = format_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "invoice_number,reference_number,debtor_name,amount,page");
    }

    #[test]
    fn test_text_summary_line() {
        let text = format_text(&sample());
        assert!(text.contains("100001-0-A"));
        assert!(text.ends_with("1 invoices, total 1,234.50\n"));
    }
}

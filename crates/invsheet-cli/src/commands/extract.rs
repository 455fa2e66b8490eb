//! Extract command - print rows parsed from a single invoice PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use invsheet_core::{ParseResult, ParserRegistry, RowField};

use super::{load_config, parse_options, print_warnings};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Supplier key (e.g. omnia, generic)
    #[arg(short, long)]
    supplier: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// JSON options (quirks, check_totals)
    #[arg(long, default_value = "{}")]
    options: String,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one line per row
    Csv,
    /// Plain text table
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let options = parse_options(&args.options)?;
    let config = load_config(config_path)?;
    let registry = ParserRegistry::builtin();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Extracting rows from {}", args.input.display());

    let input = args.input.clone();
    let supplier = args.supplier.clone();
    let result = tokio::task::spawn_blocking(move || {
        invsheet_core::parse_pdf(&registry, &config, &input, &supplier, &options)
    })
    .await??;

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
        print_warnings(&result.warnings);
    } else {
        println!("{}", output);
        for warning in &result.warnings {
            eprintln!("{} {}", style("warning:").yellow(), warning);
        }
    }

    Ok(())
}

pub(crate) fn format_result(result: &ParseResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ParseResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(RowField::ALL.iter().map(|field| field.key()))?;
    for item in &result.items {
        wtr.write_record(RowField::ALL.iter().map(|field| item.field(*field)))?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ParseResult) -> String {
    let mut output = String::new();

    if let Some(supplier) = result.header.get("supplier").and_then(|v| v.as_str()) {
        output.push_str(&format!("Supplier: {}\n", supplier));
    }
    output.push_str(&format!("Items: {}\n\n", result.items.len()));

    for item in &result.items {
        output.push_str(&format!(
            "{:<20} {:<40} {:>8} x {:>10} = {:>10}\n",
            item.product_number,
            item.product_name,
            item.delivered_qty,
            item.net_unit_price,
            item.total_price
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use invsheet_core::InvoiceRow;

    fn sample() -> ParseResult {
        ParseResult {
            items: vec![InvoiceRow {
                product_number: "VEN-161.167".to_string(),
                product_name: "D.35.8 SHOWER, ARM".to_string(),
                delivered_qty: "1".to_string(),
                net_unit_price: "1.95".to_string(),
                total_price: "1.95".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_quotes_commas() {
        let csv = format_result(&sample(), OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("product_number,product_name,customs_code,weight_g,delivered_qty,net_unit_price,total_price")
        );
        assert_eq!(lines.next(), Some("VEN-161.167,\"D.35.8 SHOWER, ARM\",,,1,1.95,1.95"));
    }

    #[test]
    fn test_text_lists_items() {
        let text = format_result(&sample(), OutputFormat::Text).unwrap();
        assert!(text.contains("Items: 1"));
        assert!(text.contains("VEN-161.167"));
    }
}

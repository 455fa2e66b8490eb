//! Convert command - fill a template from a single invoice PDF.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invsheet_core::{ConvertRequest, ParserRegistry};

use super::{load_config, parse_options, print_warnings};

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Input PDF path
    #[arg(long)]
    pdf: PathBuf,

    /// XLSX template path
    #[arg(long)]
    template: PathBuf,

    /// Output XLSX path
    #[arg(long)]
    out: PathBuf,

    /// Supplier key (e.g. omnia, generic)
    #[arg(long)]
    supplier: String,

    /// JSON options (sheet_name, mapping, clear_existing, quirks, check_totals)
    #[arg(long, default_value = "{}")]
    options: String,
}

pub async fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let options = parse_options(&args.options)?;
    let config = load_config(config_path)?;
    let registry = ParserRegistry::builtin();

    info!("Converting {}", args.pdf.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message(format!("Converting {}...", args.pdf.display()));

    let request = ConvertRequest {
        pdf: args.pdf,
        template: args.template,
        output: args.out,
        supplier: args.supplier,
        options,
    };

    let outcome = tokio::task::spawn_blocking(move || {
        invsheet_core::convert(&registry, &config, &request).map(|result| (result, request))
    })
    .await?;

    pb.finish_and_clear();
    let (result, request) = outcome?;

    println!(
        "{} Wrote {} rows to {}",
        style("✓").green(),
        result.items.len(),
        request.output.display()
    );
    print_warnings(&result.warnings);

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

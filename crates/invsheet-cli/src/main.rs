//! CLI application for converting supplier invoice PDFs into spreadsheet templates.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, convert, extract, suppliers};

/// Supplier invoice PDF to xlsx template converter
#[derive(Parser)]
#[command(name = "invsheet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one invoice PDF into a filled template
    Convert(convert::ConvertArgs),

    /// Print the rows parsed from one invoice PDF
    Extract(extract::ExtractArgs),

    /// Convert many invoice PDFs
    Batch(batch::BatchArgs),

    /// List available supplier parsers
    Suppliers(suppliers::SuppliersArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Convert(args) => convert::run(args, config_path).await,
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Suppliers(args) => suppliers::run(args).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}

//! Suppliers command - list registered parsers.

use clap::Args;
use console::style;
use serde_json::json;

use invsheet_core::ParserRegistry;

/// Arguments for the suppliers command.
#[derive(Args)]
pub struct SuppliersArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: SuppliersArgs) -> anyhow::Result<()> {
    let registry = ParserRegistry::builtin();

    if args.json {
        let list: Vec<_> = registry
            .all()
            .map(|parser| json!({ "key": parser.key(), "name": parser.display_name() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{}", style("Available suppliers:").bold());
    for parser in registry.all() {
        println!("  {:<10} {}", style(parser.key()).green(), parser.display_name());
    }

    Ok(())
}

//! Subcommands.

pub mod batch;
pub mod config;
pub mod convert;
pub mod extract;
pub mod suppliers;

use std::path::Path;

use anyhow::Context;
use console::style;
use tracing::debug;

use invsheet_core::{ConvertOptions, InvsheetConfig};

/// Load the explicit config file, else the default one if present, else defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<InvsheetConfig> {
    if let Some(path) = config_path {
        return InvsheetConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path));
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        return InvsheetConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()));
    }

    Ok(InvsheetConfig::default())
}

/// Parse `--options` JSON.
pub(crate) fn parse_options(json: &str) -> anyhow::Result<ConvertOptions> {
    ConvertOptions::from_json(json).context("Invalid --options JSON")
}

pub(crate) fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!();
    println!("{}", style("WARNINGS:").yellow());
    for warning in warnings {
        println!("- {}", warning);
    }
}

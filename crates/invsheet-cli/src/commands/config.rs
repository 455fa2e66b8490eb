//! Config command - inspect and edit the invsheet configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::{Map, Value};

use invsheet_core::models::config::SupplierProfile;
use invsheet_core::{InvsheetConfig, Supplier};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Summarize parsing, sheet and supplier profile settings
    Show {
        /// Print the raw configuration as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a configuration file with default settings
    Init(InitArgs),

    /// Print one setting as JSON
    Get {
        /// Dotted key (e.g. "sheet.header_scan_rows")
        key: String,
    },

    /// Change one setting
    Set {
        /// Dotted key; profile objects are created on demand
        key: String,
        /// New value (JSON, or a plain string)
        value: String,
    },

    /// Print where the configuration file lives
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Write here instead of the active config path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace an existing file
    #[arg(long)]
    force: bool,

    /// Add an empty profile for every built-in supplier
    #[arg(long)]
    with_profiles: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show { json } => show_config(&path, json),
        ConfigCommand::Init(init_args) => init_config(init_args, &path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invsheet")
        .join("config.json")
}

/// The stored config, or defaults when the file does not exist yet.
fn load_or_default(path: &Path) -> anyhow::Result<InvsheetConfig> {
    if !path.exists() {
        return Ok(InvsheetConfig::default());
    }
    InvsheetConfig::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))
}

fn show_config(path: &Path, as_json: bool) -> anyhow::Result<()> {
    let config = load_or_default(path)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if !path.exists() {
        println!(
            "{} {} does not exist, showing defaults",
            style("ℹ").blue(),
            path.display()
        );
    }

    let parsing = &config.parsing;
    println!("{}", style("Parsing").bold());
    println!("  max pending lines: {}", parsing.max_pending_lines);
    println!("  max pending chars: {}", parsing.max_pending_chars);
    println!("  check totals:      {}", parsing.check_totals);
    let quirks: Vec<String> = parsing.quirks.iter().map(|q| format!("{:?}", q)).collect();
    println!(
        "  quirks:            {}",
        if quirks.is_empty() { "none".to_string() } else { quirks.join(", ") }
    );

    let sheet = &config.sheet;
    println!("{}", style("Sheet").bold());
    println!(
        "  sheet:             {}",
        sheet.sheet_name.as_deref().unwrap_or("first sheet")
    );
    println!("  clear existing:    {}", sheet.clear_existing);
    println!("  header scan rows:  {}", sheet.header_scan_rows);
    println!("  mapping:");
    for (label, field) in sheet.mapping.iter() {
        println!("    {:<24} -> {}", label, style(field.key()).cyan());
    }

    println!("{}", style("Profiles").bold());
    if config.profiles.is_empty() {
        println!("  none");
    }
    for (key, profile) in &config.profiles {
        println!(
            "  {:<10} {}",
            style(key).green(),
            serde_json::to_string(&profile.options)?
        );
    }

    Ok(())
}

fn init_config(args: InitArgs, config_path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| config_path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; pass --force to replace it",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = initial_config(args.with_profiles);
    config.save(&output_path)?;

    println!(
        "{} Wrote default configuration with {} supplier profiles to {}",
        style("✓").green(),
        config.profiles.len(),
        output_path.display()
    );

    Ok(())
}

fn initial_config(with_profiles: bool) -> InvsheetConfig {
    let mut config = InvsheetConfig::default();
    if with_profiles {
        for supplier in Supplier::all() {
            config
                .profiles
                .insert(supplier.key().to_string(), SupplierProfile::default());
        }
    }
    config
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(load_or_default(path)?)?;
    let value = lookup(&json, key)
        .ok_or_else(|| anyhow::anyhow!("No setting named '{}'", key))?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

/// Follow a dotted key through nested objects.
fn lookup<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(json, |current, part| current.as_object()?.get(part))
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = load_or_default(path)?;

    let parsed: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    set_json_path(&mut json, key, parsed.clone())?;

    let updated: InvsheetConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    updated.save(path)?;

    println!(
        "{} {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed)?
    );

    Ok(())
}

/// Set a dotted key, creating objects for missing segments
/// (`profiles.omnia.options.sheet_name` on a fresh config).
fn set_json_path(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let (last, parents) = parts
        .split_last()
        .ok_or_else(|| anyhow::anyhow!("Empty configuration key"))?;

    let mut current = json;
    for part in parents {
        let obj = current
            .as_object_mut()
            .ok_or_else(|| anyhow::anyhow!("Cannot set value at non-object path: {}", key))?;
        current = obj
            .entry((*part).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
    }

    match current.as_object_mut() {
        Some(obj) => {
            obj.insert((*last).to_string(), value);
            Ok(())
        }
        None => anyhow::bail!("Cannot set value at non-object path: {}", key),
    }
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    let status = if path.exists() {
        style("present").green()
    } else {
        style("missing, run 'invsheet config init'").yellow()
    };
    println!("{} ({})", path.display(), status);

    Ok(())
}

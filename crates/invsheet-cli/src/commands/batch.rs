//! Batch command for converting multiple invoice PDFs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use invsheet_core::{ConvertRequest, InvsheetConfig, ParserRegistry};

use super::{load_config, parse_options};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// XLSX template path
    #[arg(long)]
    template: PathBuf,

    /// Supplier key (e.g. omnia, generic)
    #[arg(short, long)]
    supplier: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: PathBuf,

    /// JSON options applied to every file
    #[arg(long, default_value = "{}")]
    options: String,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of converting a single file.
struct FileResult {
    path: PathBuf,
    output: PathBuf,
    items: usize,
    warnings: Vec<String>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let options = parse_options(&args.options)?;
    let config = Arc::new(load_config(config_path)?);
    let registry = Arc::new(ParserRegistry::builtin());

    // Resolve the supplier once so a typo fails before any work starts
    registry.get(&args.supplier)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let jobs = output_paths(&files, &args.output_dir)?;

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(jobs.len());

    for (path, output) in jobs {
        let request = ConvertRequest {
            pdf: path,
            template: args.template.clone(),
            output,
            supplier: args.supplier.clone(),
            options: options.clone(),
        };
        let registry = Arc::clone(&registry);
        let config = Arc::clone(&config);
        let semaphore = Arc::clone(&semaphore);
        let pb = overall_pb.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let result = convert_file(registry, config, request).await;
            pb.inc(1);
            Ok::<_, anyhow::Error>(result)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    let mut handles = handles.into_iter();
    while let Some(handle) = handles.next() {
        let result = handle.await??;

        if let Some(message) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                error!("Failed to process {}: {}", result.path.display(), message);
                for rest in handles {
                    rest.abort();
                }
                overall_pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), message);
            }
        }
        results.push(result);
    }

    overall_pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args.output_dir.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = results.iter().filter(|r| r.error.is_none()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let warned: Vec<_> = results
        .iter()
        .filter(|r| r.error.is_none() && !r.warnings.is_empty())
        .collect();

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

    if !warned.is_empty() {
        println!();
        println!("{}", style("Files with warnings:").yellow());
        for result in &warned {
            println!("  - {} ({} warnings)", result.output.display(), result.warnings.len());
            for warning in &result.warnings {
                println!("      {}", warning);
            }
        }
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn convert_file(
    registry: Arc<ParserRegistry>,
    config: Arc<InvsheetConfig>,
    request: ConvertRequest,
) -> FileResult {
    let file_start = Instant::now();
    let path = request.pdf.clone();
    let output = request.output.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        invsheet_core::convert(&registry, &config, &request)
    })
    .await;

    let processing_time_ms = file_start.elapsed().as_millis() as u64;
    let (items, warnings, error) = match outcome {
        Ok(Ok(result)) => {
            debug!("Wrote {} rows to {}", result.items.len(), output.display());
            (result.items.len(), result.warnings, None)
        }
        Ok(Err(e)) => (0, Vec::new(), Some(e.to_string())),
        Err(e) => (0, Vec::new(), Some(format!("worker failed: {}", e))),
    };

    FileResult {
        path,
        output,
        items,
        warnings,
        error,
        processing_time_ms,
    }
}

/// One output path per input: `<output_dir>/<stem>.xlsx`. Collisions are rejected.
fn output_paths(files: &[PathBuf], output_dir: &Path) -> anyhow::Result<Vec<(PathBuf, PathBuf)>> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    let mut jobs = Vec::with_capacity(files.len());

    for path in files {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("invoice");
        let output = output_dir.join(format!("{}.xlsx", stem));

        if let Some(previous) = seen.insert(output.clone(), path) {
            anyhow::bail!(
                "{} and {} would both be written to {}",
                previous.display(),
                path.display(),
                output.display()
            );
        }
        jobs.push((path.clone(), output));
    }

    Ok(jobs)
}

/// One line of `summary.csv`.
#[derive(Serialize)]
struct SummaryRecord<'a> {
    filename: &'a str,
    status: &'a str,
    output: String,
    items: usize,
    warnings: usize,
    processing_time_ms: u64,
    error: &'a str,
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for result in results {
        wtr.serialize(SummaryRecord {
            filename: result
                .path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or(""),
            status: if result.error.is_some() { "error" } else { "success" },
            output: result.output.display().to_string(),
            items: result.items,
            warnings: result.warnings.len(),
            processing_time_ms: result.processing_time_ms,
            error: result.error.as_deref().unwrap_or(""),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths_distinct() {
        let files = vec![PathBuf::from("in/a.pdf"), PathBuf::from("in/b.PDF")];
        let jobs = output_paths(&files, Path::new("out")).unwrap();
        assert_eq!(jobs[0].1, PathBuf::from("out/a.xlsx"));
        assert_eq!(jobs[1].1, PathBuf::from("out/b.xlsx"));
    }

    #[test]
    fn test_output_paths_reject_collisions() {
        let files = vec![PathBuf::from("x/a.pdf"), PathBuf::from("y/a.pdf")];
        let err = output_paths(&files, Path::new("out")).unwrap_err();
        assert!(err.to_string().contains("out/a.xlsx"));
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let results = vec![FileResult {
            path: PathBuf::from("in/a.pdf"),
            output: PathBuf::from("out/a.xlsx"),
            items: 3,
            warnings: vec!["line 4: something".to_string()],
            error: None,
            processing_time_ms: 12,
        }];

        write_summary(&path, &results).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("filename,status,output,items"));
        assert!(content.contains("a.pdf,success,out/a.xlsx,3,1,12,"));
    }
}

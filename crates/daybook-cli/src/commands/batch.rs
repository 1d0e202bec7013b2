//! Batch processing command for multiple daily sheets.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use daybook_core::models::audit::ParsedAudit;
use daybook_core::models::config::DaybookConfig;
use daybook_core::sheet::{DailySheetParser, SheetParser};

use super::config::load_config;
use super::process::{format_audit, read_document_text, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write a summary.json with one entry per file
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    audit: Option<ParsedAudit>,
    warnings: Vec<String>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// One line of the batch summary file.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryEntry<'a> {
    file: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    audit_date: Option<String>,
    rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_sales: Option<String>,
    warnings: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "text")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(DailySheetParser::from_config(&config.extraction));

    // Parsing is CPU-bound, so each file runs on the blocking pool.
    let mut pending = stream::iter(files)
        .map(|path| {
            let config = Arc::clone(&config);
            let parser = Arc::clone(&parser);
            tokio::task::spawn_blocking(move || process_single_file(path, &parser, &config))
        })
        .buffered(args.jobs.max(1));

    let mut results = Vec::new();
    while let Some(joined) = pending.next().await {
        let result = joined?;

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                overall_pb.abandon();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        results.push(result);
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        let pretty = config.output.pretty;
        for result in &results {
            let Some(audit) = &result.audit else {
                continue;
            };

            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("audit");
            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            fs::write(&output_path, format_audit(audit, args.format, pretty)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.json"))
            .unwrap_or_else(|| PathBuf::from("summary.json"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
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
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(path: PathBuf, parser: &DailySheetParser, config: &DaybookConfig) -> ProcessResult {
    let file_start = Instant::now();

    let outcome = read_document_text(&path, config).map(|text| parser.parse(&text));
    let processing_time_ms = file_start.elapsed().as_millis() as u64;

    match outcome {
        Ok(result) => ProcessResult {
            path,
            audit: Some(result.audit),
            warnings: result.warnings,
            error: None,
            processing_time_ms,
        },
        Err(e) => ProcessResult {
            path,
            audit: None,
            warnings: Vec::new(),
            error: Some(e.to_string()),
            processing_time_ms,
        },
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let entries: Vec<SummaryEntry<'_>> = results
        .iter()
        .map(|result| {
            let file = result
                .path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("")
                .to_string();

            SummaryEntry {
                file,
                status: if result.error.is_some() { "error" } else { "ok" },
                audit_date: result
                    .audit
                    .as_ref()
                    .and_then(|a| a.summary.audit_date)
                    .map(|d| d.to_string()),
                rows: result.audit.as_ref().map_or(0, |a| a.rows.len()),
                total_sales: result
                    .audit
                    .as_ref()
                    .and_then(|a| a.summary.total_sales)
                    .map(|t| t.to_string()),
                warnings: &result.warnings,
                error: result.error.as_deref(),
                processing_time_ms: result.processing_time_ms,
            }
        })
        .collect();

    fs::write(path, serde_json::to_string_pretty(&entries)?)?;
    Ok(())
}

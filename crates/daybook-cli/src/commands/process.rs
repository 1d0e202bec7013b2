//! Process command - extract an audit from a single daily sheet.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use daybook_core::models::audit::ParsedAudit;
use daybook_core::models::config::DaybookConfig;
use daybook_core::pdf::{PdfExtractor, PdfProcessor};
use daybook_core::sheet::{DailySheetParser, SheetParser};

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF with a text layer, or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Use this audit date instead of the one found in the sheet (YYYY-MM-DD)
    #[arg(long)]
    audit_date: Option<NaiveDate>,

    /// Print extraction warnings to stderr
    #[arg(long)]
    show_warnings: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading document...");
    let text = read_document_text(&args.input, &config)?;

    pb.set_message("Extracting audit...");
    let parser = DailySheetParser::from_config(&config.extraction);
    let result = parser.parse(&text);

    pb.finish_and_clear();

    let mut audit = result.audit;
    if let Some(date) = args.audit_date {
        audit = audit.with_audit_date(date);
    }

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Extraction warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_audit(&audit, args.format, args.pretty || config.output.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read the text of a sheet from a PDF text layer or a plain text file.
pub fn read_document_text(path: &Path, config: &DaybookConfig) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let mut extractor = PdfExtractor::from_config(&config.pdf);
            extractor.load(&data)?;

            let content = extractor.extract_pages(config.pdf.max_pages)?;
            debug!(
                "PDF has {} pages, type {:?}",
                extractor.page_count(),
                content.pdf_type
            );

            if !content.pdf_type.has_text() {
                anyhow::bail!(
                    "{} has no usable text layer ({:?}); run OCR and pass the text file instead",
                    path.display(),
                    content.pdf_type
                );
            }
            Ok(content.text)
        }
        "txt" | "text" => Ok(fs::read_to_string(path)?),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

/// Load a previously saved audit, or parse a sheet into one.
pub fn load_audit(path: &Path, config: &DaybookConfig) -> anyhow::Result<ParsedAudit> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let content = fs::read_to_string(path)?;
        return serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid audit file {}: {}", path.display(), e));
    }

    let text = read_document_text(path, config)?;
    Ok(DailySheetParser::from_config(&config.extraction).parse_audit(&text))
}

pub fn format_audit(audit: &ParsedAudit, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(audit)?),
        OutputFormat::Json => Ok(serde_json::to_string(audit)?),
        OutputFormat::Text => Ok(format_audit_text(audit)),
    }
}

fn amount<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_audit_text(audit: &ParsedAudit) -> String {
    let summary = &audit.summary;

    let mut output = String::new();

    output.push_str(&format!(
        "Audit date: {}\n\n",
        amount(&summary.audit_date)
    ));

    output.push_str("Summary:\n");
    output.push_str(&format!("  Opening balance:     {}\n", amount(&summary.opening_balance)));
    output.push_str(&format!("  Total sales:         {}\n", amount(&summary.total_sales)));
    output.push_str(&format!("  Office cash (night): {}\n", amount(&summary.office_cash_night)));
    output.push_str(&format!("  Office cash (sheet): {}\n", amount(&summary.office_cash_sheet)));
    output.push_str(&format!("  Expenditure:         {}\n", amount(&summary.expenditure)));
    output.push_str(&format!("  Balance:             {}\n", amount(&summary.balance)));
    output.push('\n');

    output.push_str(&format!("Rows ({}):\n", audit.rows.len()));
    output.push_str(&format!(
        "  {:<28} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>9} {:>10}\n",
        "Brand", "ml", "O.B", "Rcvd", "Total", "Oth", "C.B", "Sales", "Rate", "Amount"
    ));
    for row in &audit.rows {
        output.push_str(&format!(
            "  {:<28} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>9} {:>10}\n",
            row.brand_name,
            row.size_ml,
            row.opening,
            row.received,
            row.total,
            row.others,
            row.closing,
            row.sales_qty,
            amount(&row.rate),
            amount(&row.sales_amount)
        ));
    }

    output
}

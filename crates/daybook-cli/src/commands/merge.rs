//! Merge command - apply one column of a newer extraction onto an audit.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use daybook_core::sheet::{merge_audit, MergeField, MergeKey};

use super::config::load_config;
use super::process::{format_audit, load_audit, OutputFormat};

/// Arguments for the merge command.
#[derive(Args)]
pub struct MergeArgs {
    /// Audit to update (saved JSON, or a sheet to parse)
    #[arg(required = true)]
    base: PathBuf,

    /// Newer extraction to take the column from (saved JSON, or a sheet)
    #[arg(required = true)]
    incoming: PathBuf,

    /// Column to take from the incoming rows
    #[arg(long, value_enum, default_value = "sales-amount")]
    field: FieldArg,

    /// How rows are matched
    #[arg(long, value_enum, default_value = "brand")]
    key: KeyArg,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum FieldArg {
    /// Sales amount column
    SalesAmount,
    /// Sales quantity column
    SalesQty,
}

impl From<FieldArg> for MergeField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::SalesAmount => MergeField::SalesAmount,
            FieldArg::SalesQty => MergeField::SalesQty,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum KeyArg {
    /// Brand name only
    Brand,
    /// Brand name and bottle size
    BrandSize,
}

impl From<KeyArg> for MergeKey {
    fn from(arg: KeyArg) -> Self {
        match arg {
            KeyArg::Brand => MergeKey::Brand,
            KeyArg::BrandSize => MergeKey::BrandAndSize,
        }
    }
}

pub async fn run(args: MergeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    for path in [&args.base, &args.incoming] {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
    }

    let mut audit = load_audit(&args.base, &config)?;
    let incoming = load_audit(&args.incoming, &config)?;

    let changed = merge_audit(&mut audit, &incoming, args.field.into(), args.key.into());
    info!(
        "Merged {:?} from {} incoming rows, {} rows changed",
        args.field,
        incoming.rows.len(),
        changed
    );

    let output = format_audit(&audit, OutputFormat::Json, args.pretty || config.output.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Updated {} of {} rows, written to {}",
            style("✓").green(),
            changed,
            audit.rows.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

//! # dossier-cli
//!
//! Command-line interface for producing graduate archive transfer slips.

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use config::Config;
use dossier_core::{generate_documents, merge_files, BatchDate};
use dossier_pdf::{list_pdfs, Stamper};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// dossier - archive transfer slips from spreadsheet records
#[derive(Parser)]
#[command(name = "dossier")]
#[command(author, version, about = "Merge records, fill transfer slips, crop and stamp PDFs", long_about = None)]
struct Cli {
    /// YAML config file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory relative paths are resolved against (default: desktop)
    #[arg(long, global = true, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy source records into the template spreadsheet's columns
    Merge(MergeArgs),
    /// Fill one transfer slip per spreadsheet row
    Generate(GenerateArgs),
    /// Crop and stamp the first page of each PDF
    Stamp(StampArgs),
}

#[derive(Args)]
struct MergeArgs {
    /// Source spreadsheet
    #[arg(long)]
    source: Option<PathBuf>,
    /// Template spreadsheet whose first row is the header
    #[arg(long)]
    template: Option<PathBuf>,
    /// Output spreadsheet
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Merged spreadsheet
    #[arg(long)]
    sheet: Option<PathBuf>,
    /// Document template (.docx)
    #[arg(long)]
    template: Option<PathBuf>,
    /// Directory for the generated documents
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
struct StampArgs {
    /// Directory holding the PDFs
    #[arg(long)]
    input_dir: Option<PathBuf>,
    /// Directory for the stamped PDFs
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Stamp image
    #[arg(long, conflicts_with = "no_stamp")]
    stamp: Option<PathBuf>,
    /// Fraction of the page height to keep
    #[arg(long)]
    top_ratio: Option<f64>,
    /// Render resolution
    #[arg(long)]
    dpi: Option<u32>,
    /// Crop only
    #[arg(long)]
    no_stamp: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::from_yaml_file(path)?,
        None => Config::default(),
    };
    let base = config::base_dir(cli.base_dir.as_deref(), config.base_dir.as_deref());
    config.resolve_paths(&base);
    tracing::info!("Base directory: {}", base.display());

    match cli.command {
        Command::Merge(args) => run_merge(config, args),
        Command::Generate(args) => run_generate(config, args),
        Command::Stamp(args) => run_stamp(config, args),
    }
}

fn run_merge(config: Config, args: MergeArgs) -> Result<()> {
    let mut merge = config.merge;
    if let Some(source) = args.source {
        merge.source = source;
    }
    if let Some(template) = args.template {
        merge.template = template;
    }
    if let Some(output) = args.output {
        merge.output = output;
    }

    let report = merge_files(&merge, &config.aliases).context("Merge failed")?;

    if !report.unresolved.is_empty() {
        println!(
            "{} No source column for: {}",
            "[INFO]".cyan(),
            report.unresolved.join(", ")
        );
    }
    println!(
        "{} Wrote {} rows starting at row 2 ({} blank records skipped)",
        "[OK]".green().bold(),
        report.written,
        report.skipped
    );
    println!("{} Output: {}", "[OK]".green().bold(), merge.output.display());
    Ok(())
}

fn run_generate(config: Config, args: GenerateArgs) -> Result<()> {
    let mut generate = config.generate;
    if let Some(sheet) = args.sheet {
        generate.sheet = sheet;
    }
    if let Some(template) = args.template {
        generate.template = template;
    }
    if let Some(output_dir) = args.output_dir {
        generate.output_dir = output_dir;
    }

    let report =
        generate_documents(&generate, BatchDate::today()).context("Document generation failed")?;

    for path in &report.generated {
        println!("{} {}", "[OK]".green().bold(), path.display());
    }
    for failure in &report.failures {
        println!(
            "{} Row {} ({}): {}",
            "[FAIL]".red().bold(),
            failure.position,
            failure.label,
            failure.message
        );
    }
    println!(
        "{} {} documents in {}",
        "[DONE]".cyan().bold(),
        report.generated.len(),
        generate.output_dir.display()
    );
    Ok(())
}

fn run_stamp(config: Config, args: StampArgs) -> Result<()> {
    let mut stamp = config.stamp;
    if let Some(input_dir) = args.input_dir {
        stamp.input_dir = input_dir;
    }
    if let Some(output_dir) = args.output_dir {
        stamp.output_dir = output_dir;
    }
    if let Some(file) = args.stamp {
        stamp.stamp_file = Some(file);
    }
    if args.no_stamp {
        stamp.stamp_file = None;
    }
    if let Some(top_ratio) = args.top_ratio {
        stamp.options.top_ratio = top_ratio;
    }
    if let Some(dpi) = args.dpi {
        stamp.options.dpi = dpi;
    }

    let pdfs = list_pdfs(&stamp.input_dir)?;
    let stamp_path = stamp.stamp_path();
    let stamper = Stamper::new(stamp.options.clone(), stamp_path.as_deref())?;
    if let Some(path) = stamp_path.as_ref().filter(|_| !stamper.has_stamp()) {
        println!(
            "{} Stamp image unavailable: {} (cropping only)",
            "[WARN]".yellow().bold(),
            path.display()
        );
    }

    println!("{} Found {} PDFs", "[INFO]".cyan(), pdfs.len());
    let report = stamper.process_all(&pdfs, &stamp.output_dir);

    for (input, output) in &report.processed {
        println!(
            "{} {} → {}",
            "[OK]".green().bold(),
            file_name(input),
            output.display()
        );
    }
    for failure in &report.failures {
        println!(
            "{} {}: {}",
            "[FAIL]".red().bold(),
            file_name(&failure.path),
            failure.message
        );
    }
    println!(
        "{} Output directory: {}",
        "[DONE]".cyan().bold(),
        stamp.output_dir.display()
    );
    Ok(())
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

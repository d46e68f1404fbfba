//! # CLI Module
//!
//! Command-line interface for the diversity-selection engine.
//!
//! ## Usage
//! ```bash
//! # Keep the 500 most diverse images (rolling window, seed 42)
//! smart-downsample select hashes.tsv --target 500
//!
//! # Exact selection for a small set
//! smart-downsample select hashes.tsv --target 50 --mode exact
//!
//! # Proportional shares per fingerprint bucket, JSON output
//! smart-downsample select hashes.tsv --target 500 --bucket-bits 4 --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use smart_downsample::core::bucketed::{select_bucketed, BucketConfig, BucketStats};
use smart_downsample::core::manifest::Manifest;
use smart_downsample::core::pipeline::{Selection, SelectionConfig, SelectionStats};
use smart_downsample::core::selector::SelectionMode;
use smart_downsample::error::Result;
use std::path::PathBuf;

/// Smart Downsample - keep the most diverse images, drop the near-duplicates
#[derive(Parser, Debug)]
#[command(name = "smart-downsample")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select a diverse subset from a fingerprint manifest
    Select {
        /// Manifest of `path<TAB>hex fingerprint` lines or a JSON array
        manifest: PathBuf,

        /// Number of entries to keep
        #[arg(short = 'n', long)]
        target: usize,

        /// Selection algorithm
        #[arg(short, long, default_value = "rolling-window")]
        mode: Method,

        /// Rolling window size (rolling-window mode only)
        #[arg(short, long, default_value = "100")]
        window: usize,

        /// Seed for reproducible selection
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Split the target across buckets keyed by this many leading bits
        #[arg(long)]
        bucket_bits: Option<u32>,

        /// Order entries by (directory, file name) before selecting
        #[arg(long)]
        sort_by_directory: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    /// Compare against every selected image - best for a few thousand images
    Exact,
    /// Compare against the most recent selections - scales to 100k+ images
    #[value(alias = "rolling_window")]
    RollingWindow,
}

impl Method {
    fn into_mode(self, window_size: usize) -> SelectionMode {
        match self {
            Method::Exact => SelectionMode::Exact,
            Method::RollingWindow => SelectionMode::rolling_window(window_size),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (selected paths only)
    Minimal,
}

/// Everything the output formats need
struct Report {
    selected: Vec<String>,
    stats: SelectionStats,
    buckets: Option<Vec<BucketStats>>,
    skipped: Vec<String>,
    duration_ms: u64,
}

/// Run the CLI
pub fn run() -> Result<()> {
    smart_downsample::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Select {
            manifest,
            target,
            mode,
            window,
            seed,
            bucket_bits,
            sort_by_directory,
            output,
            verbose,
        } => {
            let config = SelectionConfig {
                target_count: target,
                mode: mode.into_mode(window),
                seed,
                show_progress: verbose,
            };
            run_select(manifest, config, bucket_bits, sort_by_directory, output, verbose)
        }
    }
}

fn run_select(
    manifest_path: PathBuf,
    config: SelectionConfig,
    bucket_bits: Option<u32>,
    sort_by_directory: bool,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    // Reject bad parameters before touching the manifest
    let bucket_config = match bucket_bits {
        Some(bits) => {
            let bucket_config = BucketConfig::new(bits, config.clone());
            bucket_config.validate()?;
            Some(bucket_config)
        }
        None => None,
    };
    let selection = Selection::from_config(config)?;

    let mut manifest = Manifest::read(&manifest_path)?;
    if sort_by_directory {
        manifest.sort_by_directory();
    }
    let skipped = std::mem::take(&mut manifest.errors);
    for error in &skipped {
        tracing::warn!("skipped manifest entry: {}", error);
    }

    let (paths, fingerprints) = manifest.into_parts();

    let report = match bucket_config {
        Some(bucket_config) => {
            let result = select_bucketed(&paths, &fingerprints, &bucket_config)?;
            Report {
                selected: result.selected,
                stats: result.stats,
                buckets: Some(result.buckets),
                skipped,
                duration_ms: result.duration_ms,
            }
        }
        None => {
            let result = selection.run(&paths, &fingerprints)?;
            Report {
                selected: result.selected,
                stats: result.stats,
                buckets: None,
                skipped,
                duration_ms: result.duration_ms,
            }
        }
    };

    match output {
        OutputFormat::Pretty => print_pretty_results(&Term::stderr(), &report, verbose),
        OutputFormat::Json => print_json_results(&report),
        OutputFormat::Minimal => print_minimal_results(&report),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, report: &Report, verbose: bool) {
    let stats = &report.stats;

    term.write_line(&format!(
        "{} {}",
        style("Smart Downsample").bold().cyan(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} of {} images selected in {:.1}s ({})",
        style(stats.selected).cyan(),
        style(stats.considered).cyan(),
        report.duration_ms as f64 / 1000.0,
        stats.mode
    ))
    .ok();
    term.write_line(&format!("  {} excluded", style(stats.excluded).dim()))
        .ok();

    if stats.shortfall > 0 {
        term.write_line(&format!(
            "  {} only {} valid images for a target of {}",
            style("!").yellow().bold(),
            stats.selected,
            stats.requested
        ))
        .ok();
    }

    if !report.skipped.is_empty() {
        term.write_line(&format!(
            "  {} manifest entries skipped",
            style(report.skipped.len()).yellow()
        ))
        .ok();
        if verbose {
            for error in &report.skipped {
                term.write_line(&format!("    {}", style(error).dim())).ok();
            }
        }
    }

    if let Some(buckets) = &report.buckets {
        term.write_line("").ok();
        term.write_line(&format!("{}", style("Buckets:").bold().underlined()))
            .ok();
        for bucket in buckets {
            term.write_line(&format!(
                "  {:>6}  {:>6} total  {:>6} kept  stride {:.1}",
                style(format!("{:#x}", bucket.key)).bold(),
                bucket.original_size,
                bucket.kept,
                bucket.stride
            ))
            .ok();
        }
    }

    term.write_line("").ok();
    for path in &report.selected {
        println!("{}", path);
    }
}

fn print_json_results(report: &Report) {
    let output = serde_json::json!({
        "selected": report.selected,
        "stats": report.stats,
        "buckets": report.buckets,
        "skipped": report.skipped,
        "duration_ms": report.duration_ms,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(error) => tracing::error!("failed to render JSON output: {}", error),
    }
}

fn print_minimal_results(report: &Report) {
    for path in &report.selected {
        println!("{}", path);
    }
}

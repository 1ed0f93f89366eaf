//! bi-dedup - Idea CSV consolidator
//!
//! Merges near-duplicate ideas from every CSV file in the data directory into
//! one ranked `consolidated_ideas.csv`.
//!
//! **Usage:**
//! ```bash
//! bi-dedup [--dir <path>] [--output <file>] [--threshold 0.85] [--fail-fast] [--report <file>]
//! ```

use anyhow::Result;
use bi_common::config::{load_config, resolve_data_dir, DATA_DIR_ENV};
use bi_common::logging::init_logging;
use bi_dedup::{consolidate, DedupError, DedupOptions, LoadPolicy};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Idea CSV consolidator
#[derive(Parser, Debug)]
#[clap(name = "bi-dedup")]
#[clap(about = "Consolidate near-duplicate ideas from evaluation CSV files")]
struct Args {
    /// Directory holding the source CSV files
    #[clap(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// TOML configuration file
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Consolidated output file (default: <dir>/consolidated_ideas.csv)
    #[clap(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Similarity threshold in [0, 1]
    #[clap(long)]
    threshold: Option<f64>,

    /// Abort on the first unreadable CSV file instead of skipping it
    #[clap(long)]
    fail_fast: bool,

    /// Export run statistics to a JSON file
    #[clap(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            let code = e
                .downcast_ref::<DedupError>()
                .map(DedupError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let loaded =
        load_config(args.config.as_deref()).map_err(|e| DedupError::Config(e.to_string()))?;
    let config = loaded.config;
    init_logging(&config.logging).map_err(|e| DedupError::Config(e.to_string()))?;

    info!(
        "Starting bi-dedup (idea consolidator) v{}",
        env!("CARGO_PKG_VERSION")
    );
    loaded.origin.log();

    let data_dir = resolve_data_dir(args.dir.as_deref(), DATA_DIR_ENV, &config)
        .map_err(|e| DedupError::Config(e.to_string()))?;

    let options = DedupOptions {
        output_file: args
            .output
            .unwrap_or_else(|| data_dir.join(&config.consolidated_file)),
        threshold: args
            .threshold
            .unwrap_or(config.dedup.similarity_threshold),
        policy: if args.fail_fast || config.dedup.fail_fast {
            LoadPolicy::FailFast
        } else {
            LoadPolicy::SkipAndReport
        },
        data_dir,
    };

    let run = consolidate(&options)?;
    print!("{}", run.report.format_summary());
    println!("\n✓ Consolidated data saved to {}", options.output_file.display());

    if let Some(path) = &args.report {
        run.report.export_json(path)?;
        info!("Report exported to {}", path.display());
        println!("✓ Report exported to {}", path.display());
    }

    Ok(())
}


//! bi-apply - Apply consolidated ideas back to the source CSV files
//!
//! **Usage:**
//! ```bash
//! bi-apply [--dir <path>] [--consolidated <file name>]
//! ```

use anyhow::Result;
use bi_apply::{apply_consolidated, ApplyError};
use bi_common::config::{load_config, resolve_data_dir, DATA_DIR_ENV};
use bi_common::logging::init_logging;
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Apply consolidated ideas back to the source CSV files
#[derive(Parser, Debug)]
#[clap(name = "bi-apply")]
#[clap(about = "Back up and overwrite every source CSV with the consolidated ideas")]
struct Args {
    /// Directory holding the source CSV files
    #[clap(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// TOML configuration file
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Consolidated file name inside the data directory
    #[clap(long, value_name = "NAME")]
    consolidated: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            let code = e
                .downcast_ref::<ApplyError>()
                .map(ApplyError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let loaded =
        load_config(args.config.as_deref()).map_err(|e| ApplyError::Config(e.to_string()))?;
    let config = loaded.config;
    init_logging(&config.logging).map_err(|e| ApplyError::Config(e.to_string()))?;

    info!(
        "Starting bi-apply (consolidated data apply-back) v{}",
        env!("CARGO_PKG_VERSION")
    );
    loaded.origin.log();

    let data_dir = resolve_data_dir(args.dir.as_deref(), DATA_DIR_ENV, &config)
        .map_err(|e| ApplyError::Config(e.to_string()))?;
    let consolidated = args
        .consolidated
        .unwrap_or_else(|| config.consolidated_file.clone());

    println!("=== Updating CSV Files with Consolidated Data ===\n");
    let summary = apply_consolidated(&data_dir, &consolidated, &Local::now())?;
    print!("{}", summary.format_summary());

    Ok(())
}

//! bi-links - GitHub Pages link manifest generator
//!
//! **Usage:**
//! ```bash
//! bi-links [--root <repo>] [--manifest LINK.txt]
//! ```

use anyhow::Result;
use bi_common::config::load_config;
use bi_common::logging::init_logging;
use bi_links::{generate_manifest, repo_identity, LinkError};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// GitHub Pages link manifest generator
#[derive(Parser, Debug)]
#[clap(name = "bi-links")]
#[clap(about = "Update the GitHub Pages link manifest for every HTML file")]
struct Args {
    /// Repository root
    #[clap(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// TOML configuration file
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Manifest file name inside the repository root
    #[clap(long, value_name = "NAME")]
    manifest: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let loaded =
        load_config(args.config.as_deref()).map_err(|e| LinkError::Config(e.to_string()))?;
    let config = loaded.config;
    init_logging(&config.logging).map_err(|e| LinkError::Config(e.to_string()))?;

    info!(
        "Starting bi-links (link manifest generator) v{}",
        env!("CARGO_PKG_VERSION")
    );
    loaded.origin.log();

    let manifest = args
        .manifest
        .unwrap_or_else(|| config.links.manifest_file.clone());

    let identity = repo_identity(&args.root)?;
    println!("✓ Repository: {}", identity);

    let summary = generate_manifest(&args.root, &manifest, &identity)?;
    println!("✓ Found {} HTML file(s):", summary.entries.len());
    for entry in &summary.entries {
        println!("  - {}", entry.path);
    }
    println!(
        "✓ Successfully updated {} ({} descriptions kept)",
        manifest, summary.preserved
    );
    println!("Done! Please review {} and update descriptions as needed.", manifest);

    Ok(())
}

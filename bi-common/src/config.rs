//! Configuration loading and data directory resolution
//!
//! Settings come from three places, highest priority first:
//! 1. Command-line arguments
//! 2. Environment variables (`BI_DATA_DIR`, `BI_CONFIG`)
//! 3. TOML configuration file
//!
//! A missing TOML file is not an error: the tools fall back to built-in
//! defaults and log a warning. There is no compiled default for the data
//! directory, since `bi-apply` overwrites files in it.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the idea data directory
pub const DATA_DIR_ENV: &str = "BI_DATA_DIR";

/// Environment variable naming the TOML configuration file
pub const CONFIG_ENV: &str = "BI_CONFIG";

/// Default consolidated output file name inside the data directory
pub const DEFAULT_CONSOLIDATED_FILE: &str = "consolidated_ideas.csv";

/// Default manifest file name for bi-links
pub const DEFAULT_MANIFEST_FILE: &str = "LINK.txt";

/// Default fuzzy-match threshold for idea names
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Directory holding the idea CSV files (optional)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Consolidated output file name, relative to the data directory
    #[serde(default = "default_consolidated_file")]
    pub consolidated_file: String,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// bi-dedup settings (optional)
    #[serde(default)]
    pub dedup: DedupSettings,

    /// bi-links settings (optional)
    #[serde(default)]
    pub links: LinksSettings,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            consolidated_file: default_consolidated_file(),
            logging: LoggingConfig::default(),
            dedup: DedupSettings::default(),
            links: LinksSettings::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Consolidation settings
#[derive(Debug, Clone, Deserialize)]
pub struct DedupSettings {
    /// Minimum similarity ratio for two idea names to match
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Abort on the first unreadable CSV file instead of skipping it
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for DedupSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            fail_fast: false,
        }
    }
}

/// Link manifest settings
#[derive(Debug, Clone, Deserialize)]
pub struct LinksSettings {
    /// Manifest file name, relative to the repository root
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
}

impl Default for LinksSettings {
    fn default() -> Self {
        Self {
            manifest_file: default_manifest_file(),
        }
    }
}

fn default_consolidated_file() -> String {
    DEFAULT_CONSOLIDATED_FILE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_manifest_file() -> String {
    DEFAULT_MANIFEST_FILE.to_string()
}

/// Locate the TOML configuration file
///
/// Priority: explicit path → `BI_CONFIG` → `<config dir>/bi/config.toml`.
/// Returns `None` when no candidate is known.
pub fn config_file_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("bi").join("config.toml"))
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from this file
    File(PathBuf),
    /// This file was looked for but does not exist
    Missing(PathBuf),
    /// No candidate path at all (no `--config`, no `BI_CONFIG`, no config dir)
    Defaults,
}

impl ConfigOrigin {
    /// Log the origin; call once the tracing subscriber is installed
    pub fn log(&self) {
        match self {
            Self::File(path) => info!("Loaded configuration from {}", path.display()),
            Self::Missing(path) => warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            ),
            Self::Defaults => warn!("No config file location known, using built-in defaults"),
        }
    }
}

/// Configuration plus its origin
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub origin: ConfigOrigin,
}

/// Locate and load the configuration for a binary
///
/// Lookup follows [`config_file_path`]. Nothing is logged here since the
/// subscriber depends on the result; callers log [`ConfigOrigin`] afterwards.
pub fn load_config(cli_arg: Option<&Path>) -> Result<LoadedConfig> {
    let path = config_file_path(cli_arg);
    let config = load_toml_config(path.as_deref())?;

    let origin = match path {
        Some(path) if path.exists() => ConfigOrigin::File(path),
        Some(path) => ConfigOrigin::Missing(path),
        None => ConfigOrigin::Defaults,
    };

    Ok(LoadedConfig { config, origin })
}

/// Load TOML configuration with graceful degradation
///
/// A missing file yields defaults; an unreadable or malformed file is a
/// configuration error.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    validate_threshold(config.dedup.similarity_threshold)?;

    Ok(config)
}

/// Resolve the data directory
///
/// Priority: CLI argument → environment variable → TOML `data_dir`.
/// The result is validated with [`validate_directory`].
pub fn resolve_data_dir(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> Result<PathBuf> {
    let resolved = if let Some(path) = cli_arg {
        info!("Data directory: {} (from command line)", path.display());
        path.to_path_buf()
    } else if let Some(path) = std::env::var(env_var_name)
        .ok()
        .filter(|p| !p.trim().is_empty())
    {
        info!("Data directory: {} (from {})", path, env_var_name);
        PathBuf::from(path)
    } else if let Some(path) = &config.data_dir {
        info!("Data directory: {} (from config file)", path.display());
        path.clone()
    } else {
        return Err(Error::Config(format!(
            "No data directory configured. Use one of:\n\
             1. Command line: --dir <path>\n\
             2. Environment: {}=<path>\n\
             3. TOML config: data_dir = \"<path>\"",
            env_var_name
        )));
    };

    validate_directory(&resolved)?;
    Ok(resolved)
}

/// Check that a path exists and is a directory
pub fn validate_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(Error::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Check that a similarity threshold lies in [0, 1]
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(Error::Config(format!(
            "similarity_threshold must be between 0 and 1, got {}",
            threshold
        )));
    }
    Ok(())
}

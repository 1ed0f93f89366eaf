//! Error types for bi-links

use std::path::PathBuf;
use thiserror::Error;

/// Link manifest error type
#[derive(Debug, Error)]
pub enum LinkError {
    /// `git remote get-url origin` failed or could not be run
    #[error("Unable to get git remote: {0}")]
    GitRemote(String),

    /// Remote URL is not a recognized GitHub form
    #[error("Unsupported git remote URL: {0}")]
    UnsupportedRemote(String),

    /// Repository root missing or unreadable
    #[error("Cannot scan {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: bi_common::Error,
    },

    #[error("No HTML files found under {}", .0.display())]
    NoHtmlFiles(PathBuf),

    /// Manifest could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: bi_common::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for link manifest operations
pub type LinkResult<T> = Result<T, LinkError>;

//! Common error types for the BI tools

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for BI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the BI tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse or write error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested path not found
    #[error("Not found: {0}")]
    NotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Invalid user input or file content
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

//! Error types for bi-dedup
//!
//! Input errors (unreadable directory or file) and output errors (destination
//! not writable) are kept apart so the caller can tell a bad input set from a
//! failed write.

use std::path::PathBuf;
use thiserror::Error;

/// Consolidation error type
#[derive(Debug, Error)]
pub enum DedupError {
    /// Input directory or file could not be read
    #[error("Input error in {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: bi_common::Error,
    },

    /// Consolidated output or report could not be written
    #[error("Output error writing {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: bi_common::Error,
    },

    /// Invalid options
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DedupError {
    pub fn input(path: impl Into<PathBuf>, source: impl Into<bi_common::Error>) -> Self {
        Self::Input {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, source: impl Into<bi_common::Error>) -> Self {
        Self::Output {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn is_output(&self) -> bool {
        matches!(self, Self::Output { .. })
    }

    /// Process exit code: 2 for output errors, 1 for everything else
    pub fn exit_code(&self) -> u8 {
        if self.is_output() {
            2
        } else {
            1
        }
    }
}

/// Result type for consolidation operations
pub type DedupResult<T> = Result<T, DedupError>;

//! Error types for bi-apply

use std::path::PathBuf;
use thiserror::Error;

/// Apply-back error type
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Consolidated file missing or unparsable; nothing was touched
    #[error("Cannot read consolidated file {}: {source}", .path.display())]
    ConsolidatedInput {
        path: PathBuf,
        #[source]
        source: bi_common::Error,
    },

    /// Backup directory or copy could not be created; no source was overwritten
    #[error("Backup failed for {}: {source}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: bi_common::Error,
    },

    /// Backup copy does not match its source
    #[error("Backup of {} does not match source (expected {expected}, got {actual})", .path.display())]
    BackupMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// A source file could not be rewritten
    #[error("Failed to rewrite {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: bi_common::Error,
    },

    /// Invalid options
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApplyError {
    pub fn consolidated_input(path: impl Into<PathBuf>, source: impl Into<bi_common::Error>) -> Self {
        Self::ConsolidatedInput {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn backup(path: impl Into<PathBuf>, source: impl Into<bi_common::Error>) -> Self {
        Self::Backup {
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

    /// Process exit code: 1 for input and configuration errors, 2 for write failures
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConsolidatedInput { .. } | Self::Config(_) => 1,
            Self::Backup { .. } | Self::BackupMismatch { .. } | Self::Output { .. } => 2,
        }
    }
}

/// Result type for apply-back operations
pub type ApplyResult<T> = Result<T, ApplyError>;

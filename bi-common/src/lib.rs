//! # BI Common Library
//!
//! Shared code for the BI command-line tools including:
//! - Error types
//! - Configuration loading and data directory resolution
//! - Logging initialization
//! - Idea record model
//! - CSV table reading and writing
//! - Atomic file writes

pub mod config;
pub mod error;
pub mod fs_utils;
pub mod logging;
pub mod record;
pub mod tabular;

pub use error::{Error, Result};
pub use record::IdeaRecord;

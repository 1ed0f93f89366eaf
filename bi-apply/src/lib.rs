//! bi-apply library
//!
//! Replaces every source idea CSV in a data directory with the consolidated
//! list, after a verified timestamped backup.

pub mod apply;
pub mod backup;
pub mod error;

pub use apply::{apply_consolidated, read_consolidated, target_files, ApplySummary};
pub use backup::{backup_dir_name, create_backup, sha256_file, BackedUpFile, BackupSet};
pub use error::{ApplyError, ApplyResult};

//! Timestamped backup of the source CSV files
//!
//! Every source CSV is copied into `backup_<YYYYMMDD_HHMMSS>` inside the data
//! directory and each copy is checked against its source by SHA-256 before
//! the backup counts as complete.

use crate::error::{ApplyError, ApplyResult};
use bi_common::fs_utils::{file_name_of, list_csv_files};
use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name prefix of backup directories (and of files never rewritten)
pub const BACKUP_PREFIX: &str = "backup_";

const HASH_CHUNK_SIZE: usize = 1024 * 1024;

/// `backup_YYYYMMDD_HHMMSS` for the given local time
pub fn backup_dir_name(timestamp: &DateTime<Local>) -> String {
    format!("{}{}", BACKUP_PREFIX, timestamp.format("%Y%m%d_%H%M%S"))
}

/// SHA-256 of a file as lowercase hex, read in 1MB chunks
pub fn sha256_file(path: &Path) -> bi_common::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// One verified backup copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackedUpFile {
    pub file_name: String,
    pub sha256: String,
}

/// A completed, verified backup
#[derive(Debug, Clone)]
pub struct BackupSet {
    pub dir: PathBuf,
    pub files: Vec<BackedUpFile>,
}

/// Copy every CSV in `data_dir` except `consolidated_name` into a fresh
/// timestamped directory and verify each copy
pub fn create_backup(
    data_dir: &Path,
    consolidated_name: &str,
    timestamp: &DateTime<Local>,
) -> ApplyResult<BackupSet> {
    let sources = list_csv_files(data_dir, |name| name == consolidated_name)
        .map_err(|e| ApplyError::backup(data_dir, e))?;

    let dir = data_dir.join(backup_dir_name(timestamp));
    fs::create_dir_all(&dir).map_err(|e| ApplyError::backup(&dir, e))?;

    let mut files = Vec::with_capacity(sources.len());
    for source in &sources {
        let file_name = file_name_of(source);
        let target = dir.join(&file_name);

        fs::copy(source, &target).map_err(|e| ApplyError::backup(&target, e))?;

        let expected = sha256_file(source).map_err(|e| ApplyError::backup(source, e))?;
        let actual = sha256_file(&target).map_err(|e| ApplyError::backup(&target, e))?;
        if expected != actual {
            return Err(ApplyError::BackupMismatch {
                path: target,
                expected,
                actual,
            });
        }

        debug!(file = %file_name, sha256 = %actual, "Backed up");
        files.push(BackedUpFile {
            file_name,
            sha256: actual,
        });
    }

    info!("Backed up {} CSV files to {}", files.len(), dir.display());
    Ok(BackupSet { dir, files })
}

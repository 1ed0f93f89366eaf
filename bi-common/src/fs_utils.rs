//! Filesystem helpers: atomic writes and CSV file discovery

use crate::{Error, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `contents` to `path` atomically
///
/// The data goes to `<path>.tmp` first, is synced to disk, then renamed over
/// the target. Readers never observe a partially written file. The temp file
/// is removed if any step fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = temp_path_for(path)?;

    let result = (|| -> Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() && tmp_path.exists() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            tracing::warn!("Failed to remove temp file {}: {}", tmp_path.display(), e);
        }
    }

    result
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::InvalidInput(format!("Not a file path: {}", path.display())))?;
    let mut tmp_name = OsString::from(file_name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

/// List the CSV files directly inside `dir`, sorted by file name
///
/// Subdirectories are not entered. Files whose name matches `skip` are
/// left out.
pub fn list_csv_files<F>(dir: &Path, skip: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&str) -> bool,
{
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() || !is_csv_path(&path) {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if skip(&name) {
            tracing::debug!(file = %name, "Skipping excluded CSV file");
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Check for a `.csv` extension (case-insensitive)
pub fn is_csv_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// File name of a path as a displayable string
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! Apply-back: overwrite every source CSV with the consolidated list
//!
//! Order of operations:
//! 1. Read the consolidated file. Nothing else happens if it is missing or
//!    does not parse.
//! 2. Back up every source CSV and verify the copies.
//! 3. Rewrite each target file atomically with the consolidated rows.

use crate::backup::{create_backup, BackupSet, BACKUP_PREFIX};
use crate::error::{ApplyError, ApplyResult};
use bi_common::fs_utils::{file_name_of, list_csv_files, write_atomic};
use bi_common::record::{CONSOLIDATED_FIELDS, FIELD_IDEA};
use bi_common::tabular::{read_records, render_csv};
use bi_common::{Error, IdeaRecord};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a successful apply-back
#[derive(Debug, Clone)]
pub struct ApplySummary {
    pub backup: BackupSet,
    /// Rewritten file names, sorted
    pub files_updated: Vec<String>,
    /// Rows written to each file
    pub rows_per_file: usize,
}

impl ApplySummary {
    pub fn format_summary(&self) -> String {
        let mut output = String::new();

        output.push_str("=== Summary ===\n");
        for name in &self.files_updated {
            output.push_str(&format!("  ✓ Updated: {}\n", name));
        }
        output.push_str(&format!("Updated {} CSV files\n", self.files_updated.len()));
        output.push_str(&format!(
            "Each file now contains {} unique, deduplicated ideas\n",
            self.rows_per_file
        ));
        output.push_str(&format!(
            "Original files backed up to: {}\n",
            self.backup.dir.display()
        ));

        output
    }
}

/// Read and check the consolidated file
pub fn read_consolidated(path: &Path) -> ApplyResult<Vec<IdeaRecord>> {
    let records = read_records(path).map_err(|e| ApplyError::consolidated_input(path, e))?;

    if let Some(row) = records.iter().position(|r| !r.has_field(FIELD_IDEA)) {
        return Err(ApplyError::consolidated_input(
            path,
            Error::InvalidInput(format!("row {}: missing {} column", row + 1, FIELD_IDEA)),
        ));
    }

    info!("Loaded {} unique ideas from {}", records.len(), path.display());
    Ok(records)
}

/// Source CSV files that get rewritten
pub fn target_files(data_dir: &Path, consolidated_name: &str) -> bi_common::Result<Vec<PathBuf>> {
    list_csv_files(data_dir, |name| {
        name == consolidated_name || name.starts_with(BACKUP_PREFIX)
    })
}

/// Back up and then overwrite every source CSV in `data_dir`
pub fn apply_consolidated(
    data_dir: &Path,
    consolidated_name: &str,
    timestamp: &DateTime<Local>,
) -> ApplyResult<ApplySummary> {
    let consolidated_path = data_dir.join(consolidated_name);
    let records = read_consolidated(&consolidated_path)?;

    let bytes = render_csv(
        &CONSOLIDATED_FIELDS,
        records.iter().map(|r| r.values_in_order(&CONSOLIDATED_FIELDS)),
    )
    .map_err(|e| ApplyError::consolidated_input(&consolidated_path, e))?;

    let targets =
        target_files(data_dir, consolidated_name).map_err(|e| ApplyError::output(data_dir, e))?;

    let backup = create_backup(data_dir, consolidated_name, timestamp)?;

    let mut files_updated = Vec::with_capacity(targets.len());
    for target in &targets {
        write_atomic(target, &bytes).map_err(|e| ApplyError::output(target, e))?;
        let name = file_name_of(target);
        info!(file = %name, rows = records.len(), "Updated");
        files_updated.push(name);
    }

    Ok(ApplySummary {
        backup,
        files_updated,
        rows_per_file: records.len(),
    })
}

//! Record loader
//!
//! Reads every CSV file directly inside the data directory into a
//! [`SourceCollection`]. A file that cannot be read is either skipped and
//! reported or aborts the load, depending on [`LoadPolicy`].

use crate::error::{DedupError, DedupResult};
use bi_common::config::validate_directory;
use bi_common::fs_utils::{file_name_of, list_csv_files};
use bi_common::tabular::read_records;
use bi_common::IdeaRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// What to do with a CSV file that cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Log the failure, leave the file out, keep going
    #[default]
    SkipAndReport,
    /// Abort the whole load on the first failure
    FailFast,
}

/// Idea records per source file, iterated in file name order
#[derive(Debug, Clone, Default)]
pub struct SourceCollection {
    files: BTreeMap<String, Vec<IdeaRecord>>,
}

impl SourceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, records: Vec<IdeaRecord>) {
        self.files.insert(source.into(), records);
    }

    /// (source file, records) pairs in file name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[IdeaRecord])> {
        self.files
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn total_rows(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A file left out of the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// Loaded records plus the files that were skipped
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub collection: SourceCollection,
    pub skipped: Vec<SkippedFile>,
}

/// CSV directory loader
pub struct RecordLoader {
    policy: LoadPolicy,
    excluded: Vec<String>,
}

impl RecordLoader {
    pub fn new(policy: LoadPolicy) -> Self {
        Self {
            policy,
            excluded: Vec::new(),
        }
    }

    /// Leave a file name out of the load (e.g. the consolidated output)
    pub fn exclude(mut self, file_name: impl Into<String>) -> Self {
        self.excluded.push(file_name.into());
        self
    }

    /// Load every CSV file in `dir`
    pub fn load(&self, dir: &Path) -> DedupResult<LoadOutcome> {
        validate_directory(dir).map_err(|e| DedupError::input(dir, e))?;

        let paths = list_csv_files(dir, |name| self.excluded.iter().any(|e| e == name))
            .map_err(|e| DedupError::input(dir, e))?;
        debug!(dir = %dir.display(), candidates = paths.len(), "Discovered CSV files");

        let mut outcome = LoadOutcome::default();
        for path in paths {
            let name = file_name_of(&path);
            match read_records(&path) {
                Ok(records) => {
                    debug!(file = %name, rows = records.len(), "Loaded CSV file");
                    outcome.collection.insert(name, records);
                }
                Err(e) => match self.policy {
                    LoadPolicy::FailFast => return Err(DedupError::input(path, e)),
                    LoadPolicy::SkipAndReport => {
                        warn!(file = %name, error = %e, "Skipping unreadable CSV file");
                        outcome.skipped.push(SkippedFile {
                            file: name,
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }

        info!(
            "Loaded {} CSV files ({} rows), skipped {}",
            outcome.collection.file_count(),
            outcome.collection.total_rows(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }
}

impl Default for RecordLoader {
    fn default() -> Self {
        Self::new(LoadPolicy::default())
    }
}

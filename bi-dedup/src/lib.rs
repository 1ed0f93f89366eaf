//! bi-dedup library
//!
//! Consolidates idea-evaluation CSV files into a single ranked set.
//!
//! Pipeline: [`loader`] reads every source file, [`grouper`] partitions the
//! distinct idea names into equivalence classes, [`merger`] reduces each
//! class to one aggregate, [`writer`] ranks and writes the result and
//! [`report`] summarizes the run.

pub mod error;
pub mod grouper;
pub mod loader;
pub mod merger;
pub mod report;
pub mod similarity;
pub mod writer;

pub use error::{DedupError, DedupResult};
pub use grouper::{EquivalenceClass, GroupingOutcome, MemberRecord, SimilarityGrouper};
pub use loader::{LoadOutcome, LoadPolicy, RecordLoader, SkippedFile, SourceCollection};
pub use merger::{AggregateRecord, MergedIdea, RecordMerger};
pub use report::{ConsolidationReport, RunCounts};
pub use similarity::{normalize_idea_name, NameMatcher, SequenceMatcher};
pub use writer::{ConsolidatedSet, RankedIdea};

use bi_common::config::{validate_threshold, DEFAULT_SIMILARITY_THRESHOLD};
use bi_common::fs_utils::file_name_of;
use std::path::PathBuf;
use tracing::info;

/// Options for one consolidation run
#[derive(Debug, Clone)]
pub struct DedupOptions {
    /// Directory holding the source CSV files
    pub data_dir: PathBuf,
    /// Destination file; excluded from the load when it sits in `data_dir`
    pub output_file: PathBuf,
    pub threshold: f64,
    pub policy: LoadPolicy,
}

impl DedupOptions {
    pub fn new(data_dir: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_file: output_file.into(),
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            policy: LoadPolicy::default(),
        }
    }
}

/// Result of a successful run
#[derive(Debug)]
pub struct ConsolidationRun {
    pub set: ConsolidatedSet,
    pub report: ConsolidationReport,
}

/// Names and row count folded into one aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub idea: String,
    pub names: Vec<String>,
    pub member_count: usize,
}

/// Merged set plus the counters gathered along the way
#[derive(Debug)]
pub struct Consolidation {
    pub set: ConsolidatedSet,
    /// One entry per aggregate, in grouping order
    pub groups: Vec<GroupSummary>,
    pub unnamed_rows: usize,
    pub unparsable_scores: usize,
}

impl Consolidation {
    /// Named rows that landed in some aggregate
    pub fn grouped_rows(&self) -> usize {
        self.groups.iter().map(|g| g.member_count).sum()
    }
}

/// Group, merge and rank an already loaded collection
pub fn consolidate_collection(collection: &SourceCollection, threshold: f64) -> Consolidation {
    let grouping = SimilarityGrouper::new(threshold).group(collection);
    let merger = RecordMerger::new();

    let merged: Vec<MergedIdea> = grouping
        .classes
        .iter()
        .map(|class| merger.merge(class))
        .collect();
    let unparsable_scores = merged.iter().map(|m| m.unparsable_scores).sum();
    let groups = merged
        .iter()
        .map(|m| GroupSummary {
            idea: m.aggregate.idea.clone(),
            names: m.names.clone(),
            member_count: m.member_count,
        })
        .collect();

    Consolidation {
        set: ConsolidatedSet::rank(merged),
        groups,
        unnamed_rows: grouping.unnamed_rows,
        unparsable_scores,
    }
}

/// Run the full pipeline: load, group, merge, rank, write
///
/// The output file is only written once every earlier stage has succeeded.
pub fn consolidate(options: &DedupOptions) -> DedupResult<ConsolidationRun> {
    validate_threshold(options.threshold).map_err(|e| DedupError::Config(e.to_string()))?;

    let mut loader = RecordLoader::new(options.policy);
    let output_in_data_dir = options
        .output_file
        .parent()
        .map(|parent| parent == options.data_dir.as_path() || parent.as_os_str().is_empty())
        .unwrap_or(true);
    if output_in_data_dir {
        loader = loader.exclude(file_name_of(&options.output_file));
    }

    let outcome = loader.load(&options.data_dir)?;
    let consolidation = consolidate_collection(&outcome.collection, options.threshold);

    info!(
        "Consolidated {} rows into {} unique ideas (threshold {})",
        outcome.collection.total_rows(),
        consolidation.set.len(),
        options.threshold
    );

    consolidation.set.write(&options.output_file)?;

    let counts = RunCounts {
        files_read: outcome.collection.file_count(),
        files_skipped: outcome.skipped,
        total_rows: outcome.collection.total_rows(),
        unnamed_rows: consolidation.unnamed_rows,
        unparsable_scores: consolidation.unparsable_scores,
    };
    let report = ConsolidationReport::build(
        &options.data_dir,
        &options.output_file,
        counts,
        &consolidation.set,
    );

    Ok(ConsolidationRun {
        set: consolidation.set,
        report,
    })
}

//! Consolidation statistics
//!
//! Printed after every run; optionally exported as JSON.

use crate::error::{DedupError, DedupResult};
use crate::loader::SkippedFile;
use crate::merger::format_score;
use crate::writer::ConsolidatedSet;
use bi_common::fs_utils::write_atomic;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Number of top-ranked ideas shown in the summary
pub const TOP_SAMPLE_SIZE: usize = 5;

/// One line of the top-ideas sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopIdea {
    pub idea: String,
    pub score: f64,
    pub evaluations: Option<usize>,
}

/// Statistics for one consolidation run
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidationReport {
    pub generated_at: DateTime<Utc>,
    pub data_dir: String,
    pub output_file: String,
    pub files_read: usize,
    pub files_skipped: Vec<SkippedFile>,
    /// Rows across all files read, named or not
    pub total_rows: usize,
    /// Rows without an idea name
    pub unnamed_rows: usize,
    pub unparsable_scores: usize,
    pub unique_ideas: usize,
    pub duplicates_removed: usize,
    pub top_ideas: Vec<TopIdea>,
}

/// Counters gathered while loading, grouping and merging
#[derive(Debug, Clone, Default)]
pub struct RunCounts {
    pub files_read: usize,
    pub files_skipped: Vec<SkippedFile>,
    pub total_rows: usize,
    pub unnamed_rows: usize,
    pub unparsable_scores: usize,
}

impl ConsolidationReport {
    pub fn build(
        data_dir: &Path,
        output_file: &Path,
        counts: RunCounts,
        set: &ConsolidatedSet,
    ) -> Self {
        let top_ideas = set
            .ideas()
            .iter()
            .take(TOP_SAMPLE_SIZE)
            .map(|ranked| TopIdea {
                idea: ranked.aggregate.idea.clone(),
                score: ranked.aggregate.score,
                evaluations: ranked.evaluations,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            data_dir: data_dir.display().to_string(),
            output_file: output_file.display().to_string(),
            files_read: counts.files_read,
            files_skipped: counts.files_skipped,
            total_rows: counts.total_rows,
            unnamed_rows: counts.unnamed_rows,
            unparsable_scores: counts.unparsable_scores,
            unique_ideas: set.len(),
            duplicates_removed: counts.total_rows.saturating_sub(set.len()),
            top_ideas,
        }
    }

    /// Human-readable summary for stdout
    pub fn format_summary(&self) -> String {
        let mut output = String::new();

        output.push_str("=== Consolidation Statistics ===\n");
        output.push_str(&format!("CSV files read: {}\n", self.files_read));
        if !self.files_skipped.is_empty() {
            output.push_str(&format!("CSV files skipped: {}\n", self.files_skipped.len()));
            for skipped in &self.files_skipped {
                output.push_str(&format!("  ✗ {}: {}\n", skipped.file, skipped.reason));
            }
        }
        output.push_str(&format!(
            "Original total ideas (across all files): {}\n",
            self.total_rows
        ));
        if self.unnamed_rows > 0 {
            output.push_str(&format!("Rows without an idea name: {}\n", self.unnamed_rows));
        }
        if self.unparsable_scores > 0 {
            output.push_str(&format!(
                "Unparsable scores ignored: {}\n",
                self.unparsable_scores
            ));
        }
        output.push_str(&format!(
            "Unique ideas after consolidation: {}\n",
            self.unique_ideas
        ));
        output.push_str(&format!("Duplicates removed: {}\n", self.duplicates_removed));

        if !self.top_ideas.is_empty() {
            output.push_str("\n=== Sample of Consolidated Ideas ===\n");
            for top in &self.top_ideas {
                let evals = top
                    .evaluations
                    .map(|n| format!(" ({} evals)", n))
                    .unwrap_or_default();
                output.push_str(&format!(
                    "- {}: {}{}\n",
                    top.idea,
                    format_score(top.score),
                    evals
                ));
            }
        }

        output
    }

    /// Export the report as pretty-printed JSON
    pub fn export_json(&self, path: &Path) -> DedupResult<()> {
        let json = serde_json::to_vec_pretty(self).map_err(|e| {
            DedupError::output(path, bi_common::Error::InvalidInput(e.to_string()))
        })?;
        write_atomic(path, &json).map_err(|e| DedupError::output(path, e))
    }
}

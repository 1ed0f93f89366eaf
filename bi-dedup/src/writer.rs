//! Consolidated set writer and reader

use crate::error::{DedupError, DedupResult};
use crate::merger::{format_score, parse_evaluation_count, parse_score, AggregateRecord, MergedIdea};
use bi_common::fs_utils::write_atomic;
use bi_common::record::{
    CONSOLIDATED_FIELDS, FIELD_FREE_VALUE_PROP, FIELD_IDEA, FIELD_LLM_SOURCE, FIELD_NUMBER,
    FIELD_PAID_VALUE_PROP, FIELD_SCORE, FIELD_WHY_THIS_SCORE,
};
use bi_common::tabular::{read_records, render_csv};
use bi_common::Error;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// An aggregate with its 1-based rank
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedIdea {
    pub number: usize,
    pub aggregate: AggregateRecord,
    /// Parsable scores behind the aggregate, when known
    pub evaluations: Option<usize>,
}

/// Aggregates ordered by descending score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidatedSet {
    ideas: Vec<RankedIdea>,
}

impl ConsolidatedSet {
    /// Rank merged ideas by score, highest first
    ///
    /// The sort is stable: equal scores keep their discovery order.
    pub fn rank(merged: Vec<MergedIdea>) -> Self {
        let mut merged = merged;
        merged.sort_by(|a, b| b.aggregate.score.total_cmp(&a.aggregate.score));

        let ideas = merged
            .into_iter()
            .enumerate()
            .map(|(i, m)| RankedIdea {
                number: i + 1,
                aggregate: m.aggregate,
                evaluations: Some(m.evaluations),
            })
            .collect();

        Self { ideas }
    }

    pub fn ideas(&self) -> &[RankedIdea] {
        &self.ideas
    }

    pub fn len(&self) -> usize {
        self.ideas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
    }

    /// Render the whole set as CSV bytes
    pub fn to_csv_bytes(&self) -> bi_common::Result<Vec<u8>> {
        render_csv(
            &CONSOLIDATED_FIELDS,
            self.ideas.iter().map(|idea| {
                let a = &idea.aggregate;
                [
                    idea.number.to_string(),
                    a.idea.clone(),
                    format_score(a.score),
                    a.free_value_prop.clone(),
                    a.paid_value_prop.clone(),
                    a.why_this_score.clone(),
                    a.llm_source.clone(),
                ]
            }),
        )
    }

    /// Write the set to `path`
    ///
    /// Nothing touches the destination until the full CSV has been rendered,
    /// and the final write replaces the file atomically.
    pub fn write(&self, path: &Path) -> DedupResult<()> {
        let bytes = self
            .to_csv_bytes()
            .map_err(|e| DedupError::output(path, e))?;
        write_atomic(path, &bytes).map_err(|e| DedupError::output(path, e))?;

        info!("Wrote {} consolidated ideas to {}", self.len(), path.display());
        Ok(())
    }

    /// Read a consolidated file back
    pub fn read(path: &Path) -> DedupResult<Self> {
        let records = read_records(path).map_err(|e| DedupError::input(path, e))?;

        let mut ideas = Vec::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            let number = record.get(FIELD_NUMBER).trim().parse::<usize>().map_err(|_| {
                DedupError::input(
                    path,
                    Error::InvalidInput(format!(
                        "row {}: invalid {} '{}'",
                        row + 1,
                        FIELD_NUMBER,
                        record.get(FIELD_NUMBER)
                    )),
                )
            })?;
            let score = parse_score(record.get(FIELD_SCORE)).ok_or_else(|| {
                DedupError::input(
                    path,
                    Error::InvalidInput(format!(
                        "row {}: invalid {} '{}'",
                        row + 1,
                        FIELD_SCORE,
                        record.get(FIELD_SCORE)
                    )),
                )
            })?;
            let why_this_score = record.get(FIELD_WHY_THIS_SCORE).to_string();

            ideas.push(RankedIdea {
                number,
                evaluations: parse_evaluation_count(&why_this_score),
                aggregate: AggregateRecord {
                    idea: record.get(FIELD_IDEA).to_string(),
                    score,
                    free_value_prop: record.get(FIELD_FREE_VALUE_PROP).to_string(),
                    paid_value_prop: record.get(FIELD_PAID_VALUE_PROP).to_string(),
                    why_this_score,
                    llm_source: record.get(FIELD_LLM_SOURCE).to_string(),
                },
            });
        }

        Ok(Self { ideas })
    }
}

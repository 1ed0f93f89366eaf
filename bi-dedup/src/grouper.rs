//! Similarity grouper
//!
//! Partitions the distinct idea names into equivalence classes. Names are
//! visited in first-observed order; each unassigned name seeds a new group
//! and collects every later unassigned name that matches **the seed**.
//!
//! Matching is not transitive: with A~B, B~C and A≁C, seeding at A yields
//! `{A, B}` and `{C}`.

use crate::loader::SourceCollection;
use crate::similarity::{normalize_idea_name, NameMatcher};
use bi_common::IdeaRecord;
use std::collections::HashMap;
use tracing::debug;

/// An idea row together with the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub source: String,
    pub record: IdeaRecord,
}

/// Names judged to be the same idea, and every row bearing one of them
#[derive(Debug, Clone)]
pub struct EquivalenceClass {
    /// Member names, seed first, then in discovery order
    pub names: Vec<String>,
    /// Rows grouped by name in `names` order, file order within a name
    pub members: Vec<MemberRecord>,
}

impl EquivalenceClass {
    pub fn seed(&self) -> &str {
        &self.names[0]
    }
}

/// Result of grouping a source collection
#[derive(Debug, Clone, Default)]
pub struct GroupingOutcome {
    pub classes: Vec<EquivalenceClass>,
    /// Rows with an empty idea name, left out of every class
    pub unnamed_rows: usize,
}

/// Seed-only similarity grouper
pub struct SimilarityGrouper {
    matcher: NameMatcher,
}

impl SimilarityGrouper {
    pub fn new(threshold: f64) -> Self {
        Self {
            matcher: NameMatcher::new(threshold),
        }
    }

    /// Partition names into groups, comparing each candidate to the seed only
    pub fn group_names(&self, names: &[String]) -> Vec<Vec<String>> {
        let normalized: Vec<String> = names.iter().map(|n| normalize_idea_name(n)).collect();
        let mut assigned = vec![false; names.len()];
        let mut groups = Vec::new();

        for seed in 0..names.len() {
            if assigned[seed] {
                continue;
            }
            assigned[seed] = true;

            let mut group = vec![names[seed].clone()];
            for candidate in (seed + 1)..names.len() {
                if !assigned[candidate]
                    && self
                        .matcher
                        .matches_normalized(&normalized[seed], &normalized[candidate])
                {
                    assigned[candidate] = true;
                    group.push(names[candidate].clone());
                }
            }

            if group.len() > 1 {
                debug!(seed = %names[seed], members = group.len(), "Grouped similar ideas");
            }
            groups.push(group);
        }

        groups
    }

    /// Group every named row of the collection
    pub fn group(&self, collection: &SourceCollection) -> GroupingOutcome {
        let mut order: Vec<String> = Vec::new();
        let mut rows_by_name: HashMap<String, Vec<MemberRecord>> = HashMap::new();
        let mut unnamed_rows = 0;

        for (source, records) in collection.iter() {
            for record in records {
                let name = record.idea();
                if name.trim().is_empty() {
                    unnamed_rows += 1;
                    continue;
                }
                let rows = rows_by_name.entry(name.to_string()).or_insert_with(|| {
                    order.push(name.to_string());
                    Vec::new()
                });
                rows.push(MemberRecord {
                    source: source.to_string(),
                    record: record.clone(),
                });
            }
        }

        let classes = self
            .group_names(&order)
            .into_iter()
            .map(|names| {
                let members = names
                    .iter()
                    .flat_map(|name| rows_by_name.remove(name).unwrap_or_default())
                    .collect();
                EquivalenceClass { names, members }
            })
            .collect();

        GroupingOutcome {
            classes,
            unnamed_rows,
        }
    }
}

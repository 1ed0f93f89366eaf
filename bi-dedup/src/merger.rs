//! Record merger
//!
//! Folds every row of an equivalence class into one aggregate:
//! - Canonical name: shortest normalized name, ties by original string order
//! - Score: mean of the parsable scores (0 when none), one decimal
//! - Value propositions: deduplicated, sorted, joined with ` | `
//! - Rationale: evaluation header plus one labeled block per row
//! - Provenance: sorted distinct sources

use crate::grouper::EquivalenceClass;
use crate::similarity::normalize_idea_name;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

const VALUE_PROP_SEPARATOR: &str = " | ";
const RATIONALE_SEPARATOR: &str = "\n---\n";
const UNKNOWN_SOURCE: &str = "Unknown";
const MISSING_SCORE: &str = "N/A";

/// Consolidated output for one equivalence class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRecord {
    pub idea: String,
    pub score: f64,
    pub free_value_prop: String,
    pub paid_value_prop: String,
    pub why_this_score: String,
    pub llm_source: String,
}

/// An aggregate plus bookkeeping about the rows folded into it
#[derive(Debug, Clone)]
pub struct MergedIdea {
    pub aggregate: AggregateRecord,
    /// Names of the class, seed first
    pub names: Vec<String>,
    /// Number of rows folded in
    pub member_count: usize,
    /// Number of parsable scores averaged
    pub evaluations: usize,
    /// Number of non-empty scores that failed to parse
    pub unparsable_scores: usize,
}

/// Equivalence class reducer
#[derive(Debug, Default)]
pub struct RecordMerger;

impl RecordMerger {
    pub fn new() -> Self {
        Self
    }

    /// Reduce one equivalence class to an aggregate
    pub fn merge(&self, class: &EquivalenceClass) -> MergedIdea {
        let idea = canonical_name(&class.names);

        let mut scores = Vec::new();
        let mut unparsable_scores = 0;
        let mut free_props = BTreeSet::new();
        let mut paid_props = BTreeSet::new();
        let mut sources = BTreeSet::new();
        let mut rationale_blocks = Vec::new();

        for member in &class.members {
            let row = &member.record;

            let raw_score = row.score().trim();
            if !raw_score.is_empty() {
                match parse_score(raw_score) {
                    Some(score) => scores.push(score),
                    None => {
                        unparsable_scores += 1;
                        warn!(
                            file = %member.source,
                            idea = %row.idea(),
                            score = %raw_score,
                            "Ignoring unparsable score"
                        );
                    }
                }
            }

            let free = row.free_value_prop().trim();
            if !free.is_empty() {
                free_props.insert(free.to_string());
            }
            let paid = row.paid_value_prop().trim();
            if !paid.is_empty() {
                paid_props.insert(paid.to_string());
            }

            let source = row.llm_source().trim();
            if !source.is_empty() {
                sources.insert(source.to_string());
            }

            let why = row.why_this_score();
            if !why.trim().is_empty() {
                // An empty LLM_Source cell counts as absent
                let label = if source.is_empty() { UNKNOWN_SOURCE } else { source };
                let score_text = if raw_score.is_empty() { MISSING_SCORE } else { raw_score };
                rationale_blocks.push(format!("{}: {}\n{}", label, score_text, why));
            }
        }

        let score = round_to_tenth(mean(&scores));
        let why_this_score = rationale_text(score, &scores, &rationale_blocks);

        MergedIdea {
            aggregate: AggregateRecord {
                idea,
                score,
                free_value_prop: join_set(&free_props, VALUE_PROP_SEPARATOR),
                paid_value_prop: join_set(&paid_props, VALUE_PROP_SEPARATOR),
                why_this_score,
                llm_source: format!("Consolidated from: {}", join_set(&sources, ", ")),
            },
            names: class.names.clone(),
            member_count: class.members.len(),
            evaluations: scores.len(),
            unparsable_scores,
        }
    }
}

/// Shortest normalized name; ties broken by the original string
pub fn canonical_name(names: &[String]) -> String {
    names
        .iter()
        .min_by(|a, b| {
            let a_len = normalize_idea_name(a).chars().count();
            let b_len = normalize_idea_name(b).chars().count();
            a_len.cmp(&b_len).then_with(|| a.cmp(b))
        })
        .cloned()
        .unwrap_or_default()
}

/// Parse a finite decimal score
pub fn parse_score(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|s| s.is_finite())
}

/// Render a score the way it is written to CSV: `8.0`, `7.5`, `7.25`
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Round to one decimal place the way the decimal value reads
///
/// `{:.1}` rounds the exact binary value, ties to even, so 7.25 becomes 7.2
/// and 7.35 (stored just below) becomes 7.3.
fn round_to_tenth(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

fn join_set(set: &BTreeSet<String>, separator: &str) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(separator)
}

/// `<n> evals`, then `All:`/`Used:` lines when several scores were averaged,
/// then the per-row blocks
fn rationale_text(average: f64, scores: &[f64], blocks: &[String]) -> String {
    let mut text = format!("{} evals\n", scores.len());

    if scores.len() > 1 {
        text.push_str(&format!("All: {}", format_score(average)));
    }
    text.push('\n');

    if scores.len() > 1 {
        let mut sorted = scores.to_vec();
        sorted.sort_by(f64::total_cmp);
        let used: Vec<String> = sorted.into_iter().map(format_score).collect();
        text.push_str(&format!("Used: {}\n", used.join(", ")));
    }

    text.push_str(&blocks.join(RATIONALE_SEPARATOR));
    text
}

/// Evaluation count from the first line of a rationale (`"3 evals"` → 3)
pub fn parse_evaluation_count(why_this_score: &str) -> Option<usize> {
    why_this_score
        .lines()
        .next()?
        .strip_suffix(" evals")?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouper::MemberRecord;
    use bi_common::record::{
        FIELD_FREE_VALUE_PROP, FIELD_IDEA, FIELD_LLM_SOURCE, FIELD_PAID_VALUE_PROP, FIELD_SCORE,
        FIELD_WHY_THIS_SCORE,
    };
    use bi_common::IdeaRecord;

    fn member(source: &str, fields: &[(&str, &str)]) -> MemberRecord {
        MemberRecord {
            source: source.to_string(),
            record: IdeaRecord::from_pairs(fields.iter().copied()),
        }
    }

    fn class(names: &[&str], members: Vec<MemberRecord>) -> EquivalenceClass {
        EquivalenceClass {
            names: names.iter().map(|s| s.to_string()).collect(),
            members,
        }
    }

    #[test]
    fn test_score_average() {
        let merged = RecordMerger::new().merge(&class(
            &["Idea"],
            vec![
                member("a.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "8.0")]),
                member("b.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "9.0")]),
                member("c.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "7.0")]),
            ],
        ));

        assert_eq!(merged.aggregate.score, 8.0);
        assert_eq!(merged.evaluations, 3);
        assert_eq!(merged.member_count, 3);
    }

    #[test]
    fn test_no_parsable_scores_gives_zero() {
        let merged = RecordMerger::new().merge(&class(
            &["Idea"],
            vec![
                member("a.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "")]),
                member("b.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "high")]),
            ],
        ));

        assert_eq!(merged.aggregate.score, 0.0);
        assert_eq!(merged.evaluations, 0);
        assert_eq!(merged.unparsable_scores, 1);
        assert!(merged.aggregate.why_this_score.starts_with("0 evals\n"));
    }

    #[test]
    fn test_unparsable_score_is_skipped_not_fatal() {
        let merged = RecordMerger::new().merge(&class(
            &["Idea"],
            vec![
                member("a.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "7")]),
                member("b.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "n/a")]),
                member("c.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "8")]),
            ],
        ));

        assert_eq!(merged.aggregate.score, 7.5);
        assert_eq!(merged.evaluations, 2);
        assert_eq!(merged.unparsable_scores, 1);
    }

    #[test]
    fn test_score_rounds_to_one_decimal() {
        let merged = RecordMerger::new().merge(&class(
            &["Idea"],
            vec![
                member("a.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "7")]),
                member("b.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "8")]),
                member("c.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "8")]),
            ],
        ));

        assert_eq!(merged.aggregate.score, 7.7);
    }

    fn merged_score(scores: &[&str]) -> f64 {
        let members = scores
            .iter()
            .map(|score| member("a.csv", &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, *score)]))
            .collect();
        RecordMerger::new().merge(&class(&["Idea"], members)).aggregate.score
    }

    #[test]
    fn test_score_rounding_ties_go_to_even() {
        assert_eq!(merged_score(&["7", "7.5"]), 7.2);
        assert_eq!(merged_score(&["8", "8.5"]), 8.2);
        assert_eq!(merged_score(&["7.3", "7.4"]), 7.3);
        assert_eq!(merged_score(&["6", "6.5", "7"]), 6.5);
    }

    #[test]
    fn test_rounded_average_in_rationale() {
        let merged = RecordMerger::new().merge(&class(
            &["Idea"],
            vec![
                member(
                    "a.csv",
                    &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "7"), (FIELD_WHY_THIS_SCORE, "Fine")],
                ),
                member(
                    "b.csv",
                    &[(FIELD_IDEA, "Idea"), (FIELD_SCORE, "7.5"), (FIELD_WHY_THIS_SCORE, "Good")],
                ),
            ],
        ));

        assert!(merged.aggregate.why_this_score.starts_with("2 evals\nAll: 7.2\n"));
    }

    #[test]
    fn test_canonical_name_tie_breaks_on_original() {
        let names = vec!["🚀 Great Idea".to_string(), "great idea".to_string()];
        assert_eq!(canonical_name(&names), "great idea");

        let reversed = vec!["great idea".to_string(), "🚀 Great Idea".to_string()];
        assert_eq!(canonical_name(&reversed), "great idea");
    }

    #[test]
    fn test_canonical_name_prefers_shortest_normalized() {
        let names = vec![
            "Budget Tracker Pro".to_string(),
            "✨ Budget Tracker ✨".to_string(),
        ];
        assert_eq!(canonical_name(&names), "✨ Budget Tracker ✨");
    }

    #[test]
    fn test_value_props_deduplicated_and_sorted() {
        let merged = RecordMerger::new().merge(&class(
            &["Idea"],
            vec![
                member(
                    "a.csv",
                    &[
                        (FIELD_IDEA, "Idea"),
                        (FIELD_FREE_VALUE_PROP, "Track spending "),
                        (FIELD_PAID_VALUE_PROP, "Bank sync"),
                    ],
                ),
                member(
                    "b.csv",
                    &[(FIELD_IDEA, "Idea"), (FIELD_FREE_VALUE_PROP, "Track spending")],
                ),
                member(
                    "c.csv",
                    &[
                        (FIELD_IDEA, "Idea"),
                        (FIELD_FREE_VALUE_PROP, "Alerts"),
                        (FIELD_PAID_VALUE_PROP, ""),
                    ],
                ),
            ],
        ));

        assert_eq!(merged.aggregate.free_value_prop, "Alerts | Track spending");
        assert_eq!(merged.aggregate.paid_value_prop, "Bank sync");
    }

    #[test]
    fn test_rationale_single_evaluation() {
        let merged = RecordMerger::new().merge(&class(
            &["Idea"],
            vec![member(
                "a.csv",
                &[
                    (FIELD_IDEA, "Idea"),
                    (FIELD_SCORE, "9"),
                    (FIELD_WHY_THIS_SCORE, "Large market"),
                    (FIELD_LLM_SOURCE, "model-a"),
                ],
            )],
        ));

        assert_eq!(merged.aggregate.why_this_score, "1 evals\n\nmodel-a: 9\nLarge market");
    }

    #[test]
    fn test_rationale_multiple_evaluations() {
        let merged = RecordMerger::new().merge(&class(
            &["Idea"],
            vec![
                member(
                    "a.csv",
                    &[
                        (FIELD_IDEA, "Idea"),
                        (FIELD_SCORE, "9"),
                        (FIELD_WHY_THIS_SCORE, "Large market"),
                        (FIELD_LLM_SOURCE, "model-b"),
                    ],
                ),
                member(
                    "b.csv",
                    &[
                        (FIELD_IDEA, "Idea"),
                        (FIELD_SCORE, "6"),
                        (FIELD_WHY_THIS_SCORE, "Crowded"),
                    ],
                ),
                member(
                    "c.csv",
                    &[
                        (FIELD_IDEA, "Idea"),
                        (FIELD_WHY_THIS_SCORE, "No score given"),
                        (FIELD_LLM_SOURCE, "model-a"),
                    ],
                ),
            ],
        ));

        assert_eq!(
            merged.aggregate.why_this_score,
            "2 evals\nAll: 7.5\nUsed: 6.0, 9.0\n\
             model-b: 9\nLarge market\n---\n\
             Unknown: 6\nCrowded\n---\n\
             model-a: N/A\nNo score given"
        );
        assert_eq!(merged.aggregate.llm_source, "Consolidated from: model-a, model-b");
    }

    #[test]
    fn test_blank_source_and_score_cells_get_placeholders() {
        let merged = RecordMerger::new().merge(&class(
            &["Idea"],
            vec![member(
                "a.csv",
                &[
                    (FIELD_IDEA, "Idea"),
                    (FIELD_SCORE, " "),
                    (FIELD_WHY_THIS_SCORE, "Unclear"),
                    (FIELD_LLM_SOURCE, ""),
                ],
            )],
        ));

        assert_eq!(merged.aggregate.why_this_score, "0 evals\n\nUnknown: N/A\nUnclear");
        assert_eq!(merged.aggregate.llm_source, "Consolidated from: ");
    }

    #[test]
    fn test_provenance_without_sources() {
        let merged = RecordMerger::new().merge(&class(
            &["Idea"],
            vec![member("a.csv", &[(FIELD_IDEA, "Idea")])],
        ));
        assert_eq!(merged.aggregate.llm_source, "Consolidated from: ");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(8.0), "8.0");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(7.5), "7.5");
        assert_eq!(format_score(7.25), "7.25");
    }

    #[test]
    fn test_parse_evaluation_count() {
        assert_eq!(parse_evaluation_count("3 evals\nAll: 8.0"), Some(3));
        assert_eq!(parse_evaluation_count("free text"), None);
        assert_eq!(parse_evaluation_count(""), None);
    }
}

//! Idea record model
//!
//! One row of an idea CSV file, keyed by header name. Records are built once
//! when a file is read and never modified afterwards.

use std::collections::BTreeMap;

/// Sequence number column (consolidated output only)
pub const FIELD_NUMBER: &str = "Number";
/// Idea name column
pub const FIELD_IDEA: &str = "Idea";
/// Decimal score column
pub const FIELD_SCORE: &str = "Score";
/// Free tier value proposition column
pub const FIELD_FREE_VALUE_PROP: &str = "Free_Value_Prop";
/// Paid tier value proposition column
pub const FIELD_PAID_VALUE_PROP: &str = "Paid_Value_Prop";
/// Score rationale column
pub const FIELD_WHY_THIS_SCORE: &str = "Why_This_Score";
/// Provenance column
pub const FIELD_LLM_SOURCE: &str = "LLM_Source";

/// Column order of consolidated output and rewritten source files
pub const CONSOLIDATED_FIELDS: [&str; 7] = [
    FIELD_NUMBER,
    FIELD_IDEA,
    FIELD_SCORE,
    FIELD_FREE_VALUE_PROP,
    FIELD_PAID_VALUE_PROP,
    FIELD_WHY_THIS_SCORE,
    FIELD_LLM_SOURCE,
];

/// A single idea row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaRecord {
    fields: BTreeMap<String, String>,
}

impl IdeaRecord {
    /// Build a record from (field, value) pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Field value, or the empty string when the column is absent
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    /// Whether the row carries the given column at all
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn idea(&self) -> &str {
        self.get(FIELD_IDEA)
    }

    pub fn score(&self) -> &str {
        self.get(FIELD_SCORE)
    }

    pub fn free_value_prop(&self) -> &str {
        self.get(FIELD_FREE_VALUE_PROP)
    }

    pub fn paid_value_prop(&self) -> &str {
        self.get(FIELD_PAID_VALUE_PROP)
    }

    pub fn why_this_score(&self) -> &str {
        self.get(FIELD_WHY_THIS_SCORE)
    }

    pub fn llm_source(&self) -> &str {
        self.get(FIELD_LLM_SOURCE)
    }

    /// Values in the given column order, empty for absent columns
    pub fn values_in_order<'a>(&'a self, columns: &[&str]) -> Vec<&'a str> {
        columns.iter().map(|c| self.get(c)).collect()
    }
}

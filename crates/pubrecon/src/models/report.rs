//! Reconciliation report model.

use serde::{Deserialize, Serialize};

use super::Publication;

/// An arXiv record and the institutional record it was matched with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Number of heuristics that agreed for `matched` (identifier, title).
    pub score: u32,

    /// Record from the first collection.
    pub primary: Publication,

    /// Best-scoring record from the second collection.
    pub matched: Option<Publication>,
}

/// Collection sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationStats {
    pub count_a: usize,
    pub count_b: usize,
    pub matching_count: usize,
}

/// Outcome of reconciling two collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub matching: Vec<MatchResult>,

    /// First-collection records without a correlate.
    pub unmatching: Vec<Publication>,

    pub stats: ReconciliationStats,
}

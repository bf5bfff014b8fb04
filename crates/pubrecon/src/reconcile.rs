//! Cross-provider reconciliation.
//!
//! Pairs each arXiv record with the institutional record most likely to
//! describe the same work. Two independent heuristics each add a point:
//!
//! - the arXiv identifier in the record's id also appears in the file
//!   reference of an institutional record harvested from arXiv
//! - the titles are exactly equal
//!
//! The institutional record with the highest score wins; ties keep the
//! earliest one.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::sources;
use crate::models::{MatchResult, Publication, ReconciliationReport, ReconciliationStats};

/// New-style `YYMM.NNNN` or old-style seven-digit arXiv identifier.
static ARXIV_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4}\.[0-9]{4}|[0-9]{7})").expect("valid arXiv token regex pattern")
});

/// First arXiv identifier token in `text`.
///
/// ```
/// use pubrecon::reconcile::extract_token;
///
/// assert_eq!(extract_token("http://arxiv.org/abs/1109.0505v3"), Some("1109.0505"));
/// assert_eq!(extract_token("http://arxiv.org/abs/math/0611788v2"), Some("0611788"));
/// assert_eq!(extract_token("no identifier"), None);
/// ```
#[must_use]
pub fn extract_token(text: &str) -> Option<&str> {
    ARXIV_TOKEN.find(text).map(|m| m.as_str())
}

/// Score one candidate against an arXiv record whose token is `token`.
fn score(primary: &Publication, token: Option<&str>, candidate: &Publication) -> u32 {
    let mut score = 0;

    let from_arxiv = candidate.source.as_deref() == Some(sources::ARXIV);
    if from_arxiv {
        let candidate_token = candidate.file.as_deref().and_then(extract_token);
        if token.is_some() && token == candidate_token {
            score += 1;
        }
    }

    if let (Some(a), Some(b)) = (&primary.display_name, &candidate.display_name) {
        if a == b {
            score += 1;
        }
    }

    score
}

/// Reconcile arXiv records (`primary`) against institutional records.
///
/// Pure: the result depends only on the two slices.
#[must_use]
pub fn reconcile(primary: &[Publication], institutional: &[Publication]) -> ReconciliationReport {
    let mut matching = Vec::new();
    let mut unmatching = Vec::new();

    for a in primary {
        let token = a.id.as_deref().and_then(extract_token);

        let best = institutional.iter().fold(None::<(u32, &Publication)>, |best, b| {
            let s = score(a, token, b);
            match best {
                Some((top, _)) if top >= s => best,
                _ if s > 0 => Some((s, b)),
                _ => best,
            }
        });

        match best {
            Some((score, b)) => {
                matching.push(MatchResult { score, primary: a.clone(), matched: Some(b.clone()) });
            }
            None => unmatching.push(a.clone()),
        }
    }

    tracing::info!(
        count_a = primary.len(),
        count_b = institutional.len(),
        matching = matching.len(),
        "Reconciled"
    );

    let stats = ReconciliationStats {
        count_a: primary.len(),
        count_b: institutional.len(),
        matching_count: matching.len(),
    };
    ReconciliationReport { matching, unmatching, stats }
}

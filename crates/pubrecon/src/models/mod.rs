//! Data models for normalized publications, filters and reconciliation.
//!
//! All models serialize with `#[serde(rename_all = "camelCase")]` so exported
//! JSON keeps the field names downstream tooling expects.

mod filter;
mod publication;
mod report;

pub use filter::{Department, FilterOptions, FilterQuery};
pub use publication::{
    CorrespondingAuthor, OpenAccessType, Publication, PublicationType, date_from_parts,
};
pub use report::{MatchResult, ReconciliationReport, ReconciliationStats};

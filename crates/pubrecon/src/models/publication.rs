//! Normalized publication model shared by both providers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Publication format.
///
/// Serialized with the human-readable labels the content-type filter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicationType {
    #[serde(rename = "artefact")]
    Artefact,
    #[serde(rename = "book")]
    Book,
    #[serde(rename = "chapter")]
    Chapter,
    #[serde(rename = "conference")]
    Conference,
    #[serde(rename = "journal article")]
    JournalArticle,
    #[serde(rename = "other")]
    Other,
    #[serde(rename = "report")]
    Report,
    #[serde(rename = "thesis / dissertation")]
    Thesis,
}

impl PublicationType {
    /// Every variant, in label order.
    pub const ALL: [Self; 8] = [
        Self::Artefact,
        Self::Book,
        Self::Chapter,
        Self::Conference,
        Self::JournalArticle,
        Self::Other,
        Self::Report,
        Self::Thesis,
    ];

    /// Map a Symplectic `type` attribute. Unknown tags are `Other`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "artefact" => Self::Artefact,
            "book" => Self::Book,
            "chapter" => Self::Chapter,
            "conference" => Self::Conference,
            "journal-article" => Self::JournalArticle,
            "report" => Self::Report,
            "thesis-dissertation" => Self::Thesis,
            _ => Self::Other,
        }
    }

    /// Symplectic `type` attribute for this variant.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Artefact => "artefact",
            Self::Book => "book",
            Self::Chapter => "chapter",
            Self::Conference => "conference",
            Self::JournalArticle => "journal-article",
            Self::Other => "other",
            Self::Report => "report",
            Self::Thesis => "thesis-dissertation",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Artefact => "artefact",
            Self::Book => "book",
            Self::Chapter => "chapter",
            Self::Conference => "conference",
            Self::JournalArticle => "journal article",
            Self::Other => "other",
            Self::Report => "report",
            Self::Thesis => "thesis / dissertation",
        }
    }
}

impl fmt::Display for PublicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PublicationType {
    type Err = String;

    /// Accepts either the label or the Symplectic tag, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.label() == wanted || t.tag() == wanted)
            .ok_or_else(|| format!("unknown publication type '{}'", s.trim()))
    }
}

/// Open access route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenAccessType {
    #[serde(rename = "none")]
    Closed,
    Gold,
    Silver,
}

/// The corresponding author attached during decoration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrespondingAuthor {
    pub is_academic: Option<bool>,
    pub is_current_staff: Option<bool>,
    pub title: Option<String>,
    pub initials: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    /// `"<title> <initials> <last name>"`, trimmed.
    pub academic_name: String,

    pub email_address: Option<String>,
    pub primary_group_descriptor: Option<String>,
}

impl CorrespondingAuthor {
    /// Build the display name from its parts. Missing parts are skipped.
    #[must_use]
    pub fn academic_name(title: Option<&str>, initials: Option<&str>, last_name: Option<&str>) -> String {
        [title, initials, last_name]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A publication from either provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    /// Provider-assigned identifier.
    pub id: Option<String>,

    /// Title.
    pub display_name: Option<String>,

    pub publication_type: PublicationType,

    /// Originating feed within the provider (e.g. `symplectic-manual`, `arxiv`).
    pub source: Option<String>,

    /// Publication date in epoch milliseconds.
    pub date: Option<i64>,

    /// `"<last name> <initials>"` per author, in order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Journal, conference or publisher name.
    pub publisher: Option<String>,

    pub publication_status: Option<String>,
    pub open_access_type: Option<OpenAccessType>,
    pub eissn: Option<String>,
    pub issn: Option<String>,
    pub issue_number: Option<String>,
    pub page_begin: Option<String>,
    pub page_end: Option<String>,
    pub comments: Option<String>,
    pub corresponding_author: Option<CorrespondingAuthor>,

    /// File reference, `"<url>.<extension>"`.
    pub file: Option<String>,

    /// `"<source>#<id at source>"` for every sub-record.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_ids: Vec<String>,
}

impl Publication {
    /// A publication with only its type set.
    #[must_use]
    pub const fn new(publication_type: PublicationType) -> Self {
        Self {
            id: None,
            display_name: None,
            publication_type,
            source: None,
            date: None,
            authors: Vec::new(),
            publisher: None,
            publication_status: None,
            open_access_type: None,
            eissn: None,
            issn: None,
            issue_number: None,
            page_begin: None,
            page_end: None,
            comments: None,
            corresponding_author: None,
            file: None,
            source_ids: Vec::new(),
        }
    }

    /// Return this publication with its corresponding author set.
    #[must_use]
    pub fn with_corresponding_author(self, author: Option<CorrespondingAuthor>) -> Self {
        Self { corresponding_author: author, ..self }
    }

    /// Title, or an empty string.
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.display_name.as_deref().unwrap_or_default()
    }

    /// Date as `YYYY-MM-DD` (UTC).
    #[must_use]
    pub fn date_string(&self) -> Option<String> {
        let date = DateTime::from_timestamp_millis(self.date?)?;
        Some(date.format("%Y-%m-%d").to_string())
    }
}

/// Epoch milliseconds from optional year/month/day text.
///
/// Missing or unparsable parts fall back to 1970, January and the 1st. A day
/// past the end of its month is clamped to the last day.
#[must_use]
pub fn date_from_parts(year: Option<&str>, month: Option<&str>, day: Option<&str>) -> i64 {
    let year = parse_part(year).and_then(|y| i32::try_from(y).ok()).unwrap_or(1970);
    let month = parse_part(month).filter(|m| (1..=12).contains(m)).unwrap_or(1) as u32;
    let day = parse_part(day).filter(|d| (1..=31).contains(d)).unwrap_or(1) as u32;

    let date = (1..=day)
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
        .or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1));

    date.and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

fn parse_part(value: Option<&str>) -> Option<i64> {
    value?.trim().parse().ok()
}

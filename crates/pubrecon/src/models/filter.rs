//! Fetch filters and their boundary validation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PublicationType;
use crate::error::{ApiError, ApiResult};

/// A department, known to both providers under different selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    AstroPhysics,
    Mathematics,
}

impl Department {
    /// arXiv subject category pattern.
    #[must_use]
    pub const fn arxiv_category(self) -> &'static str {
        match self {
            Self::AstroPhysics => "astro-ph*",
            Self::Mathematics => "math*",
        }
    }

    /// Symplectic group id.
    #[must_use]
    pub const fn symplectic_group(self) -> &'static str {
        match self {
            Self::AstroPhysics => "180",
            Self::Mathematics => "10",
        }
    }

    /// Department key as used in query strings.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AstroPhysics => "astro_physics",
            Self::Mathematics => "mathematics",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "astro_physics" => Ok(Self::AstroPhysics),
            "mathematics" => Ok(Self::Mathematics),
            other => Err(format!("unknown group '{other}'")),
        }
    }
}

/// Validated fetch filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Only records created on or after this day.
    pub created_since: Option<NaiveDate>,

    /// Only records that have been approved at some point.
    pub ever_approved: bool,

    pub department: Option<Department>,

    /// Keep only these types. Empty keeps everything.
    pub content_types: Vec<PublicationType>,

    /// arXiv author identifiers.
    pub author_ids: Vec<String>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            created_since: None,
            ever_approved: true,
            department: None,
            content_types: Vec::new(),
            author_ids: Vec::new(),
        }
    }
}

impl FilterOptions {
    /// Whether a publication type passes the content-type filter.
    #[must_use]
    pub fn accepts_type(&self, publication_type: PublicationType) -> bool {
        self.content_types.is_empty() || self.content_types.contains(&publication_type)
    }
}

/// Raw, unvalidated filter parameters as they arrive from a query string or
/// the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    /// `created-since`, `YYYY-MM-DD`.
    #[serde(default, rename = "c")]
    pub created_since: Option<String>,

    /// `ever-approved`, `"true"` or `"false"`.
    #[serde(default, rename = "e")]
    pub ever_approved: Option<String>,

    /// Department key.
    #[serde(default, rename = "g")]
    pub groups: Option<String>,

    /// Comma-separated content types.
    #[serde(default, rename = "t")]
    pub content_types: Option<String>,

    /// Comma-separated arXiv author ids.
    #[serde(default, rename = "a")]
    pub author_ids: Option<String>,
}

impl FilterQuery {
    /// Validate into [`FilterOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for the first malformed parameter.
    pub fn validate(&self) -> ApiResult<FilterOptions> {
        let mut options = FilterOptions::default();

        if let Some(created_since) = non_empty(self.created_since.as_deref()) {
            if created_since.len() != 10 {
                return Err(ApiError::validation("created-since", "expected YYYY-MM-DD"));
            }
            let date = NaiveDate::parse_from_str(created_since, "%Y-%m-%d")
                .map_err(|_| ApiError::validation("created-since", "expected YYYY-MM-DD"))?;
            options.created_since = Some(date);
        }

        if let Some(ever_approved) = non_empty(self.ever_approved.as_deref()) {
            options.ever_approved = match ever_approved {
                "true" => true,
                "false" => false,
                _ => return Err(ApiError::validation("ever-approved", "expected true or false")),
            };
        }

        if let Some(group) = non_empty(self.groups.as_deref()) {
            options.department =
                Some(group.parse().map_err(|e: String| ApiError::validation("groups", e))?);
        }

        if let Some(types) = non_empty(self.content_types.as_deref()) {
            options.content_types = split_list(types)
                .map(|t| t.parse().map_err(|e: String| ApiError::validation("content-types", e)))
                .collect::<ApiResult<_>>()?;
        }

        if let Some(ids) = non_empty(self.author_ids.as_deref()) {
            options.author_ids = split_list(ids).map(str::to_string).collect();
        }

        Ok(options)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|v| !v.is_empty())
}

//! arXiv Atom feed parsing.

use chrono::DateTime;

use crate::config::sources;
use crate::error::{FetchError, FetchResult};
use crate::models::{Publication, PublicationType};
use crate::sources::FeedPage;
use crate::xml::XmlNode;

/// Parse one page of an arXiv query response.
///
/// `total_pages` is derived from `opensearch:totalResults` and the page
/// size the query was made with.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] for a malformed body and
/// [`FetchError::Provider`] when arXiv answers with an error entry.
pub fn parse_feed(xml: &str, items_per_page: u32) -> FetchResult<FeedPage> {
    let feed = XmlNode::parse(xml)?;

    let total_results: u64 = feed
        .child_text("totalResults")
        .and_then(|t| t.trim().parse().ok())
        .unwrap_or(0);

    let entries: Vec<&XmlNode> = feed.children_named("entry").collect();
    if let Some(error) = entries.iter().find(|e| is_error(e)) {
        let message = error.child_text("summary").map(str::trim).unwrap_or("arXiv query failed");
        return Err(FetchError::provider(message));
    }

    Ok(FeedPage {
        total_results,
        total_pages: page_count(total_results, items_per_page),
        entry_count: entries.len(),
        publications: entries.into_iter().map(parse_entry).collect(),
    })
}

/// `ceil(total / per_page)`, saturating.
fn page_count(total_results: u64, items_per_page: u32) -> u32 {
    let per_page = u64::from(items_per_page.max(1));
    u32::try_from(total_results.div_ceil(per_page)).unwrap_or(u32::MAX)
}

fn is_error(entry: &XmlNode) -> bool {
    entry.child_text("id").is_some_and(|id| id.contains("api/errors"))
}

/// Parse one `entry` element.
#[must_use]
pub fn parse_entry(entry: &XmlNode) -> Publication {
    let text = |name| {
        entry.child_text(name).map(clean_text).filter(|t| !t.is_empty())
    };

    let date = entry
        .child_text("published")
        .and_then(|p| DateTime::parse_from_rfc3339(p.trim()).ok())
        .map(|d| d.timestamp_millis());

    let authors = entry
        .children_named("author")
        .filter_map(|a| a.child_text("name"))
        .map(clean_text)
        .filter(|n| !n.is_empty())
        .collect();

    let file = entry
        .children_named("link")
        .find(|l| l.attr("title") == Some("pdf"))
        .and_then(|l| l.attr("href"))
        .map(str::to_string);

    Publication {
        id: text("id"),
        display_name: text("title"),
        source: Some(sources::ARXIV.to_string()),
        date,
        authors,
        publisher: text("journal_ref"),
        comments: text("comment"),
        file,
        ..Publication::new(PublicationType::Other)
    }
}

/// Collapse runs of whitespace (titles wrap across lines in the feed).
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

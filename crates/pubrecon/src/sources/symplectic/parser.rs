//! Symplectic feed parsing.
//!
//! Every publication type has its own builder pulling a different set of
//! native fields from the preferred record. Builders are plain functions
//! selected from the type tag, so adding a shape is one match arm.

use super::fields::{self, RecordSelection};
use crate::error::{FetchError, FetchResult};
use crate::models::{CorrespondingAuthor, Publication, PublicationType};
use crate::sources::FeedPage;
use crate::xml::XmlNode;

/// Parse one page of the publications feed.
///
/// Confidential reports and entries without an object are skipped. The
/// returned page is not yet filtered by source or content type.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] for a malformed body and
/// [`FetchError::Provider`] when an entry carries an error element.
pub fn parse_feed(xml: &str) -> FetchResult<FeedPage> {
    let feed = XmlNode::parse(xml)?;
    let (total_results, total_pages) = pagination(&feed);

    let entries: Vec<&XmlNode> = feed.children_named("entry").collect();
    check_provider_error(&entries)?;

    let publications = entries.iter().filter_map(|entry| parse_entry(entry)).collect();

    Ok(FeedPage { total_results, total_pages, entry_count: entries.len(), publications })
}

/// Parse a relationships feed into the corresponding author.
///
/// Returns `None` when the feed reports no results or no relationship
/// entry has a related object.
///
/// # Errors
///
/// Same as [`parse_feed`].
pub fn parse_relationships(xml: &str) -> FetchResult<Option<CorrespondingAuthor>> {
    let feed = XmlNode::parse(xml)?;
    let entries: Vec<&XmlNode> = feed.children_named("entry").collect();
    check_provider_error(&entries)?;

    let (total_results, _) = pagination(&feed);
    if total_results == 0 {
        return Ok(None);
    }

    Ok(entries
        .iter()
        .find_map(|entry| entry.path(&["relationship", "related", "object"]))
        .map(corresponding_author))
}

/// `(results-count, last page number)` from the feed's pagination block.
fn pagination(feed: &XmlNode) -> (u64, u32) {
    let Some(block) = feed.child("pagination") else {
        return (0, 0);
    };

    let total_results =
        block.attr("results-count").and_then(|c| c.trim().parse().ok()).unwrap_or(0);
    let total_pages = block
        .children_named("page")
        .find(|p| p.attr("position") == Some("last"))
        .and_then(|p| p.attr("number"))
        .and_then(|n| n.trim().parse().ok())
        .unwrap_or(0);

    (total_results, total_pages)
}

fn check_provider_error(entries: &[&XmlNode]) -> FetchResult<()> {
    match entries.iter().find_map(|entry| entry.child("error")) {
        Some(error) => Err(FetchError::provider(error.text.trim())),
        None => Ok(()),
    }
}

/// Parse one `entry` element.
///
/// Returns `None` for a confidential report or an entry without an object.
#[must_use]
pub fn parse_entry(entry: &XmlNode) -> Option<Publication> {
    let object = entry.child("object")?;
    let publication_type = PublicationType::from_tag(object.attr("type").unwrap_or_default());
    let selection = RecordSelection::select(object);

    let builder: fn(&RecordSelection<'_>) -> Option<Publication> = match publication_type {
        PublicationType::Artefact => artefact,
        PublicationType::Book | PublicationType::Chapter => book,
        PublicationType::Conference => conference,
        PublicationType::JournalArticle => journal_article,
        PublicationType::Other => other,
        PublicationType::Report => report,
        PublicationType::Thesis => thesis,
    };

    let mut publication = builder(&selection)?;
    publication.publication_type = publication_type;
    publication.id = object.attr("id").map(str::to_string);
    Some(publication)
}

/// Fields every shape shares.
fn base(selection: &RecordSelection<'_>) -> Publication {
    let record = selection.preferred;
    Publication {
        display_name: fields::text(record, "title"),
        source: fields::source_name(record),
        date: fields::date(selection, "publication-date"),
        publication_status: fields::text(record, "publication-status"),
        comments: fields::text(record, "notes"),
        file: fields::file(record),
        source_ids: selection.source_ids.clone(),
        ..Publication::new(PublicationType::Other)
    }
}

fn with_pages(mut publication: Publication, record: &XmlNode) -> Publication {
    let pages = fields::pagination(record);
    publication.page_begin = pages.begin;
    publication.page_end = pages.end;
    publication
}

fn artefact(selection: &RecordSelection<'_>) -> Option<Publication> {
    Some(base(selection))
}

fn book(selection: &RecordSelection<'_>) -> Option<Publication> {
    let record = selection.preferred;
    let publication = Publication {
        authors: fields::authors(record),
        publisher: fields::text(record, "publisher"),
        issue_number: fields::issue(record),
        ..base(selection)
    };
    Some(with_pages(publication, record))
}

fn conference(selection: &RecordSelection<'_>) -> Option<Publication> {
    let record = selection.preferred;
    // Published proceedings are filed as conferences with journal metadata.
    let publisher =
        fields::text(record, "name-of-conference").or_else(|| fields::text(record, "journal"));
    let publication = Publication {
        authors: fields::authors(record),
        publisher,
        issue_number: fields::issue(record),
        ..base(selection)
    };
    Some(with_pages(publication, record))
}

fn journal_article(selection: &RecordSelection<'_>) -> Option<Publication> {
    let record = selection.preferred;
    let publication = Publication {
        authors: fields::authors(record),
        publisher: fields::text(record, "journal"),
        issue_number: fields::issue(record),
        issn: fields::text(record, "issn"),
        eissn: fields::text(record, "eissn"),
        ..base(selection)
    };
    Some(with_pages(publication, record))
}

fn other(selection: &RecordSelection<'_>) -> Option<Publication> {
    let record = selection.preferred;
    let publication = Publication { authors: fields::authors(record), ..base(selection) };
    Some(with_pages(publication, record))
}

fn report(selection: &RecordSelection<'_>) -> Option<Publication> {
    let record = selection.preferred;
    if fields::boolean(record, "confidential") == Some(true) {
        return None;
    }
    Some(Publication {
        authors: fields::authors(record),
        publisher: fields::text(record, "publisher"),
        ..base(selection)
    })
}

fn thesis(selection: &RecordSelection<'_>) -> Option<Publication> {
    let record = selection.preferred;
    Some(Publication {
        authors: fields::authors(record),
        publisher: fields::text(record, "publisher")
            .or_else(|| fields::text(record, "name-of-conference")),
        ..base(selection)
    })
}

fn corresponding_author(object: &XmlNode) -> CorrespondingAuthor {
    let flag = |name| match fields::user_field(object, name).as_deref() {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    };

    let title = fields::user_field(object, "title");
    let initials = fields::user_field(object, "initials");
    let last_name = fields::user_field(object, "last-name");
    let academic_name = CorrespondingAuthor::academic_name(
        title.as_deref(),
        initials.as_deref(),
        last_name.as_deref(),
    );

    CorrespondingAuthor {
        is_academic: flag("is-academic"),
        is_current_staff: flag("is-current-staff"),
        first_name: fields::user_field(object, "first-name"),
        email_address: fields::user_field(object, "email-address"),
        primary_group_descriptor: fields::user_field(object, "primary-group-descriptor"),
        title,
        initials,
        last_name,
        academic_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(results: u64, last: Option<u32>, entries: &str) -> String {
        let last = last
            .map(|n| format!(r#"<api:page position="last" number="{n}"/>"#))
            .unwrap_or_default();
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
            <feed xmlns="http://www.w3.org/2005/Atom" xmlns:api="http://www.symplectic.co.uk/publications/api">
              <api:pagination results-count="{results}" items-per-page="25">
                <api:page position="this" number="1"/>{last}
              </api:pagination>
              {entries}
            </feed>"#
        )
    }

    fn entry(id: u32, type_tag: &str, source: &str, native: &str) -> String {
        format!(
            r#"<entry><api:object id="{id}" type="{type_tag}">
                 <api:records><api:record source-name="{source}" id-at-source="src-{id}">
                   <api:native>{native}</api:native>
                 </api:record></api:records>
               </api:object></entry>"#
        )
    }

    fn text_field(name: &str, value: &str) -> String {
        format!(r#"<api:field name="{name}" type="text"><api:text>{value}</api:text></api:field>"#)
    }

    #[test]
    fn test_journal_article_fields() {
        let native = [
            text_field("title", "On Things"),
            text_field("journal", "Journal of Things"),
            text_field("issn", "1234-5678"),
            text_field("volume", "4"),
            text_field("issue", "2"),
            text_field("notes", "accepted"),
        ]
        .concat();
        let xml = feed(1, Some(1), &entry(7, "journal-article", "manual", &native));

        let page = parse_feed(&xml).unwrap();
        assert_eq!(page.total_results, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.entry_count, 1);

        let publication = &page.publications[0];
        assert_eq!(publication.id.as_deref(), Some("7"));
        assert_eq!(publication.publication_type, PublicationType::JournalArticle);
        assert_eq!(publication.display_name.as_deref(), Some("On Things"));
        assert_eq!(publication.publisher.as_deref(), Some("Journal of Things"));
        assert_eq!(publication.issn.as_deref(), Some("1234-5678"));
        assert_eq!(publication.issue_number.as_deref(), Some("vol 4 issue 2"));
        assert_eq!(publication.comments.as_deref(), Some("accepted"));
        assert_eq!(publication.source.as_deref(), Some("symplectic-manual"));
        assert_eq!(publication.source_ids, vec!["symplectic-manual#src-7"]);
    }

    #[test]
    fn test_conference_falls_back_to_journal() {
        let native = text_field("journal", "Proceedings Journal");
        let xml = feed(1, Some(1), &entry(1, "conference", "arxiv", &native));
        let page = parse_feed(&xml).unwrap();
        assert_eq!(page.publications[0].publisher.as_deref(), Some("Proceedings Journal"));

        let native = [text_field("name-of-conference", "ConfX"), native].concat();
        let xml = feed(1, Some(1), &entry(1, "conference", "arxiv", &native));
        let page = parse_feed(&xml).unwrap();
        assert_eq!(page.publications[0].publisher.as_deref(), Some("ConfX"));
    }

    #[test]
    fn test_confidential_report_is_dropped() {
        let confidential =
            r#"<api:field name="confidential" type="boolean"><api:boolean>true</api:boolean></api:field>"#;
        let open =
            r#"<api:field name="confidential" type="boolean"><api:boolean>false</api:boolean></api:field>"#;
        let entries = [entry(1, "report", "manual", confidential), entry(2, "report", "manual", open)];
        let page = parse_feed(&feed(2, Some(1), &entries.concat())).unwrap();

        assert_eq!(page.entry_count, 2);
        assert_eq!(page.publications.len(), 1);
        assert_eq!(page.publications[0].id.as_deref(), Some("2"));
    }

    #[test]
    fn test_unknown_type_is_other() {
        let xml = feed(1, Some(1), &entry(3, "patent", "manual", &text_field("title", "P")));
        let page = parse_feed(&xml).unwrap();
        assert_eq!(page.publications[0].publication_type, PublicationType::Other);
        assert_eq!(page.publications[0].display_name.as_deref(), Some("P"));
    }

    #[test]
    fn test_artefact_has_no_authors_or_publisher() {
        let native = [
            text_field("publisher", "Gallery"),
            r#"<api:field name="authors" type="person-list"><api:people><api:person><api:last-name>X</api:last-name><api:initials>Y</api:initials></api:person></api:people></api:field>"#.to_string(),
        ]
        .concat();
        let page = parse_feed(&feed(1, Some(1), &entry(4, "artefact", "manual", &native))).unwrap();
        let publication = &page.publications[0];
        assert!(publication.authors.is_empty());
        assert_eq!(publication.publisher, None);
    }

    #[test]
    fn test_zero_results_feed() {
        let page = parse_feed(&feed(0, None, "")).unwrap();
        assert_eq!(page.total_results, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.publications.is_empty());
    }

    #[test]
    fn test_missing_last_marker_reports_zero_pages() {
        let xml = feed(1, None, &entry(1, "book", "manual", ""));
        assert_eq!(parse_feed(&xml).unwrap().total_pages, 0);
    }

    #[test]
    fn test_embedded_error_is_provider_error() {
        let xml = feed(1, Some(1), "<entry><api:error code=\"1\">Invalid group</api:error></entry>");
        let err = parse_feed(&xml).unwrap_err();
        assert!(matches!(err, FetchError::Provider { ref message } if message == "Invalid group"));
    }

    #[test]
    fn test_embedded_error_without_results_is_provider_error() {
        let entry = "<entry><api:error code=\"invalid-parameter\">The group 999 does not exist</api:error></entry>";

        let err = parse_feed(&feed(0, None, entry)).unwrap_err();
        assert_eq!(err.to_string(), "The group 999 does not exist");

        // No pagination block at all
        let bare = format!(
            r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:api="http://www.symplectic.co.uk/publications/api">{entry}</feed>"#
        );
        assert!(matches!(parse_feed(&bare), Err(FetchError::Provider { .. })));
        assert!(matches!(parse_relationships(&bare), Err(FetchError::Provider { .. })));
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        assert!(matches!(parse_feed("<feed><entry>"), Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_relationships() {
        let xml = feed(
            1,
            Some(1),
            r#"<entry><api:relationship id="9" type-id="8"><api:related direction="from">
                 <api:object category="user" id="55">
                   <api:is-academic>true</api:is-academic>
                   <api:is-current-staff>false</api:is-current-staff>
                   <api:title>Dr</api:title>
                   <api:initials>J</api:initials>
                   <api:first-name>Jane</api:first-name>
                   <api:last-name>Smith</api:last-name>
                   <api:email-address>js@example.ac.uk</api:email-address>
                   <api:primary-group-descriptor>MATHS</api:primary-group-descriptor>
                 </api:object>
               </api:related></api:relationship></entry>"#,
        );

        let author = parse_relationships(&xml).unwrap().unwrap();
        assert_eq!(author.academic_name, "Dr J Smith");
        assert_eq!(author.is_academic, Some(true));
        assert_eq!(author.is_current_staff, Some(false));
        assert_eq!(author.first_name.as_deref(), Some("Jane"));
        assert_eq!(author.email_address.as_deref(), Some("js@example.ac.uk"));
        assert_eq!(author.primary_group_descriptor.as_deref(), Some("MATHS"));
    }

    #[test]
    fn test_relationships_without_results() {
        assert_eq!(parse_relationships(&feed(0, None, "")).unwrap(), None);
    }
}

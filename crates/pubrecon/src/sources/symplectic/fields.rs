//! Typed accessors over Symplectic records.
//!
//! A Symplectic entry wraps one `object` with one or more `record`s, one per
//! ingestion source. Each record keeps its data as a list of `native/field`
//! elements tagged with a `name` and a `type`. Every accessor here is total:
//! missing structure yields `None` (or an empty list), never an error.

use crate::config::sources;
use crate::models::date_from_parts;
use crate::xml::XmlNode;

/// Stand-in for entries that carry no records at all.
static EMPTY_RECORD: XmlNode =
    XmlNode { name: String::new(), attributes: Vec::new(), text: String::new(), children: Vec::new() };

/// Page range of a record. A side whose value is `n/a` is left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRange {
    pub begin: Option<String>,
    pub end: Option<String>,
}

/// The sub-records of one entry and the one chosen to read fields from.
#[derive(Debug, Clone)]
pub struct RecordSelection<'a> {
    /// `"<normalized source>#<id at source>"` per record.
    pub source_ids: Vec<String>,

    /// First record whose source is allow-listed, else the first record.
    pub preferred: &'a XmlNode,

    /// All records, in document order.
    pub records: Vec<&'a XmlNode>,
}

impl<'a> RecordSelection<'a> {
    /// Select the preferred record of an `object` element.
    #[must_use]
    pub fn select(object: &'a XmlNode) -> Self {
        let records: Vec<&XmlNode> = object
            .child("records")
            .map(|r| r.children_named("record").collect())
            .unwrap_or_default();

        let preferred = sources::ALLOWED
            .iter()
            .find_map(|allowed| {
                records.iter().copied().find(|r| source_name(r).as_deref() == Some(*allowed))
            })
            .or_else(|| records.first().copied())
            .unwrap_or(&EMPTY_RECORD);

        let source_ids = records
            .iter()
            .map(|r| {
                format!(
                    "{}#{}",
                    source_name(r).unwrap_or_default(),
                    r.attr("id-at-source").unwrap_or_default()
                )
            })
            .collect();

        Self { source_ids, preferred, records }
    }
}

/// Map a raw source name to the name used for filtering and source ids.
#[must_use]
pub fn normalize_source(name: &str) -> String {
    if name == sources::MANUAL { sources::SYMPLECTIC_MANUAL.to_string() } else { name.to_string() }
}

/// Normalized source name of a record.
#[must_use]
pub fn source_name(record: &XmlNode) -> Option<String> {
    record.attr("source-name").map(normalize_source)
}

fn native_fields(record: &XmlNode) -> impl Iterator<Item = &XmlNode> {
    record.child("native").into_iter().flat_map(|n| n.children_named("field"))
}

/// Field element by its `name` attribute.
#[must_use]
pub fn field<'a>(record: &'a XmlNode, name: &str) -> Option<&'a XmlNode> {
    native_fields(record).find(|f| f.attr("name") == Some(name))
}

/// Field element by its `type` attribute.
#[must_use]
pub fn field_by_type<'a>(record: &'a XmlNode, type_tag: &str) -> Option<&'a XmlNode> {
    native_fields(record).find(|f| f.attr("type") == Some(type_tag))
}

/// Text value of a named field.
#[must_use]
pub fn text(record: &XmlNode, name: &str) -> Option<String> {
    field(record, name)?.child_text("text").map(str::to_string)
}

/// Boolean value of a named field.
#[must_use]
pub fn boolean(record: &XmlNode, name: &str) -> Option<bool> {
    match field(record, name)?.child_text("boolean")?.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// `"vol <volume> issue <issue>"`, or `None` when both are missing.
#[must_use]
pub fn issue(record: &XmlNode) -> Option<String> {
    let volume = text(record, "volume");
    let issue = text(record, "issue");
    if volume.is_none() && issue.is_none() {
        return None;
    }
    Some(format!("vol {} issue {}", volume.unwrap_or_default(), issue.unwrap_or_default()))
}

/// Begin and end pages.
#[must_use]
pub fn pagination(record: &XmlNode) -> PageRange {
    let Some(pages) = field(record, "pagination").and_then(|f| f.child("pagination")) else {
        return PageRange::default();
    };
    let page = |name| {
        pages
            .child_text(name)
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != "n/a")
            .map(str::to_string)
    };
    PageRange { begin: page("begin-page"), end: page("end-page") }
}

/// Date of a named date field as epoch milliseconds.
///
/// Looks in the preferred record first, then in the other records in order.
#[must_use]
pub fn date(selection: &RecordSelection<'_>, name: &str) -> Option<i64> {
    let date_field = field(selection.preferred, name)
        .or_else(|| selection.records.iter().find_map(|r| field(r, name)))?;
    let parts = date_field.child("date");
    let part = |n| parts.and_then(|d| d.child_text(n));
    Some(date_from_parts(part("year"), part("month"), part("day")))
}

/// Authors from the record's person list, `"<last name> <initials>"` each.
#[must_use]
pub fn authors(record: &XmlNode) -> Vec<String> {
    let Some(people) = field_by_type(record, "person-list").and_then(|f| f.child("people")) else {
        return Vec::new();
    };
    people
        .children_named("person")
        .map(|person| {
            let last_name = person.child_text("last-name").unwrap_or_default();
            let initials = person.child_text("initials").unwrap_or_default();
            format!("{last_name} {initials}").trim().to_string()
        })
        .collect()
}

/// First attached file as `"<url>.<extension>"`.
#[must_use]
pub fn file(record: &XmlNode) -> Option<String> {
    let file = record.path(&["native", "files", "file"])?;
    let url = file.child_text("file-url").map(str::trim).filter(|u| !u.is_empty())?;
    match file.child_text("extension").map(str::trim).filter(|e| !e.is_empty()) {
        Some(extension) => Some(format!("{url}.{extension}")),
        None => Some(url.to_string()),
    }
}

/// Text of a direct child of a user object (corresponding-author lookups).
#[must_use]
pub fn user_field(object: &XmlNode, name: &str) -> Option<String> {
    object.child_text(name).map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

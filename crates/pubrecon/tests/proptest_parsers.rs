//! Property-based tests for feed parsing and reconciliation.

mod common;

use proptest::prelude::*;
use pubrecon::models::{PublicationType, date_from_parts};
use pubrecon::reconcile::{extract_token, reconcile};
use pubrecon::sources::{arxiv, symplectic};

/// Known tags plus arbitrary ones.
fn arb_type_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("artefact".to_string()),
        Just("book".to_string()),
        Just("chapter".to_string()),
        Just("conference".to_string()),
        Just("journal-article".to_string()),
        Just("other".to_string()),
        Just("thesis-dissertation".to_string()),
        "[a-z-]{0,20}",
    ]
}

proptest! {
    /// Date parts never panic and always give a valid timestamp.
    #[test]
    fn date_from_parts_is_total(
        year in proptest::option::of("[0-9a-z/ -]{0,6}"),
        month in proptest::option::of("[0-9a-z]{0,3}"),
        day in proptest::option::of("[0-9a-z]{0,3}"),
    ) {
        let millis = date_from_parts(year.as_deref(), month.as_deref(), day.as_deref());
        prop_assert!(chrono::DateTime::from_timestamp_millis(millis).is_some());
    }

    /// Every non-confidential entry parses, whatever its type tag.
    #[test]
    fn symplectic_entries_always_parse(tags in proptest::collection::vec(arb_type_tag(), 1..20)) {
        let entries: Vec<String> = tags
            .iter()
            .enumerate()
            .map(|(i, tag)| common::symplectic_entry(i as u32, tag, "manual", "Title"))
            .collect();
        let xml = common::symplectic_feed(entries.len() as u64, 1, Some(1), &entries);

        let page = symplectic::parse_feed(&xml).unwrap();
        prop_assert_eq!(page.entry_count, tags.len());
        prop_assert_eq!(page.publications.len(), tags.len());
        for publication in &page.publications {
            prop_assert!(PublicationType::ALL.contains(&publication.publication_type));
        }
    }

    /// Arbitrary bodies give a page or an error, never a panic.
    #[test]
    fn parsers_never_panic(body in ".{0,400}") {
        let _ = symplectic::parse_feed(&body);
        let _ = symplectic::parse_relationships(&body);
        let _ = arxiv::parse_feed(&body, 50);
    }

    /// Tokens come back exactly as embedded.
    #[test]
    fn modern_tokens_are_extracted(yymm in "[0-9]{4}", num in "[0-9]{4}", version in 1u8..9) {
        let id = format!("http://arxiv.org/abs/{yymm}.{num}v{version}");
        let expected = format!("{yymm}.{num}");
        prop_assert_eq!(extract_token(&id), Some(expected.as_str()));
    }

    /// Every arXiv record lands in exactly one side of the report.
    #[test]
    fn reconcile_partitions_primary(n in 0usize..15, m in 0usize..15) {
        let xml = common::arxiv_feed(
            n as u64,
            &(0..n)
                .map(|i| common::arxiv_entry(&format!("1409.{i:04}v1"), &format!("T{i}"), "2014-09-18T10:00:00Z"))
                .collect::<Vec<_>>(),
        );
        let primary = arxiv::parse_feed(&xml, 50).unwrap().publications;

        let entries: Vec<String> = (0..m)
            .map(|i| common::symplectic_entry(i as u32, "journal-article", "manual", &format!("T{}", i * 2)))
            .collect();
        let xml = common::symplectic_feed(m as u64, 1, Some(1), &entries);
        let institutional = symplectic::parse_feed(&xml).unwrap().publications;

        let report = reconcile(&primary, &institutional);
        prop_assert_eq!(report.matching.len() + report.unmatching.len(), n);
        prop_assert_eq!(report.stats.count_a, n);
        prop_assert_eq!(report.stats.count_b, m);
        prop_assert!(report.matching.iter().all(|m| m.score >= 1 && m.score <= 2));
    }
}

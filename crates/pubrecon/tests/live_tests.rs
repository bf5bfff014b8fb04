//! Tests against the live arXiv API.
//!
//! The Symplectic instance sits behind the institution's network, so only
//! arXiv is exercised here.
//! Run with: `cargo test --features integration -- --nocapture`

#![cfg(feature = "integration")]

use chrono::{Duration, Utc};

use pubrecon::models::{Department, FilterOptions};
use pubrecon::sources::PublicationSource;
use pubrecon::{ArxivClient, Config, ProgressReporter};

#[tokio::test]
async fn test_recent_astro_preprints() {
    let config = Config { arxiv_items_per_page: 20, ..Config::default() };
    let client = ArxivClient::new(&config).expect("Failed to create client");

    let options = FilterOptions {
        department: Some(Department::AstroPhysics),
        created_since: Some((Utc::now() - Duration::days(2)).date_naive()),
        ..FilterOptions::default()
    };
    let publications = client
        .fetch(&options, &ProgressReporter::disabled())
        .await
        .expect("arXiv fetch failed");

    for publication in publications.iter().take(5) {
        println!("{:?} {}", publication.id, publication.title_or_default());
        assert!(publication.id.as_deref().is_some_and(|id| id.contains("arxiv.org/abs/")));
        assert!(publication.date.is_some());
    }
}

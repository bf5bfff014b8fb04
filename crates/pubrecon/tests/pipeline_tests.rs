//! Two-provider search against mocked arXiv and Symplectic APIs.

mod common;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{arxiv_entry, arxiv_feed, symplectic_entry, symplectic_feed};
use pubrecon::models::FilterOptions;
use pubrecon::{ArxivClient, ProgressReporter, Provider, SymplecticClient, pipeline};

fn xml(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

#[tokio::test]
async fn test_no_preprints_means_no_institutional_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(xml(arxiv_feed(0, &[])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/publications"))
        .respond_with(xml(symplectic_feed(0, 1, None, &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = common::config(&mock_server);
    let outcome = pipeline::search(
        &ArxivClient::new(&config).unwrap(),
        &SymplecticClient::new(&config).unwrap(),
        &FilterOptions::default(),
        &ProgressReporter::disabled(),
    )
    .await
    .unwrap();

    assert!(outcome.report.matching.is_empty());
    assert!(outcome.report.unmatching.is_empty());
    assert!(outcome.institutional.is_none());
}

#[tokio::test]
async fn test_harvested_record_matches_by_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(xml(arxiv_feed(
            1,
            &[arxiv_entry("1109.0505v3", "Stable homotopy", "2011-09-02T17:02:06Z")],
        )))
        .mount(&mock_server)
        .await;

    // Harvested copy with a different title and the preprint's PDF attached.
    let harvested = symplectic_entry(9, "journal-article", "arxiv", "Stable Homotopy Theory").replace(
        "</api:native>",
        "<api:files><api:file><api:file-url>http://arxiv.org/pdf/1109.0505v3</api:file-url>\
         <api:extension>pdf</api:extension></api:file></api:files></api:native>",
    );
    Mock::given(method("GET"))
        .and(path("/publications"))
        .respond_with(xml(symplectic_feed(1, 1, Some(1), &[harvested])))
        .mount(&mock_server)
        .await;

    let config = common::config(&mock_server);
    let (progress, mut rx) = ProgressReporter::channel();
    let outcome = pipeline::search(
        &ArxivClient::new(&config).unwrap(),
        &SymplecticClient::new(&config).unwrap(),
        &FilterOptions::default(),
        &progress,
    )
    .await
    .unwrap();

    assert_eq!(outcome.report.stats.matching_count, 1);
    assert_eq!(outcome.report.matching[0].score, 1);
    assert_eq!(outcome.institutional.map(|r| r.len()), Some(1));

    drop(progress);
    let mut providers = Vec::new();
    while let Some(event) = rx.recv().await {
        providers.push(event.provider);
    }
    assert_eq!(providers, vec![Provider::Arxiv, Provider::Symplectic]);
}

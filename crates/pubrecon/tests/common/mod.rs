//! Feed fixtures shared by the integration tests.
#![allow(dead_code)]

use pubrecon::Config;
use wiremock::MockServer;

/// Test configuration pointed at the mock server.
pub fn config(mock_server: &MockServer) -> Config {
    Config::for_testing(&mock_server.uri())
}

/// One Symplectic publication entry.
pub fn symplectic_entry(id: u32, type_tag: &str, source: &str, title: &str) -> String {
    format!(
        r#"<entry>
      <title>{title}</title>
      <api:object category="publication" id="{id}" type="{type_tag}">
        <api:records>
          <api:record format="native" id="{id}" source-name="{source}" id-at-source="src-{id}">
            <api:native>
              <api:field name="title" type="text" display-name="Title"><api:text>{title}</api:text></api:field>
              <api:field name="journal" type="text"><api:text>Journal {id}</api:text></api:field>
              <api:field name="publication-date" type="date">
                <api:date><api:year>2014</api:year><api:month>9</api:month><api:day>18</api:day></api:date>
              </api:field>
              <api:field name="authors" type="person-list">
                <api:people>
                  <api:person><api:last-name>Smith</api:last-name><api:initials>J</api:initials></api:person>
                </api:people>
              </api:field>
            </api:native>
          </api:record>
        </api:records>
      </api:object>
    </entry>"#
    )
}

/// A Symplectic feed page.
pub fn symplectic_feed(results: u64, this_page: u32, last_page: Option<u32>, entries: &[String]) -> String {
    let last = last_page
        .map(|n| format!(r#"<api:page position="last" number="{n}"/>"#))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:api="http://www.symplectic.co.uk/publications/api">
  <title>Publications</title>
  <api:pagination results-count="{results}" items-per-page="25">
    <api:page position="first" number="1"/>
    <api:page position="this" number="{this_page}"/>
    {last}
  </api:pagination>
  {}
</feed>"#,
        entries.concat()
    )
}

/// `count` manual journal articles with ids starting at `first_id`.
pub fn journal_articles(first_id: u32, count: u32) -> Vec<String> {
    (first_id..first_id + count)
        .map(|id| symplectic_entry(id, "journal-article", "manual", &format!("Article {id}")))
        .collect()
}

/// A relationships feed naming one corresponding author.
pub fn relationships_feed(last_name: &str) -> String {
    symplectic_feed(
        1,
        1,
        Some(1),
        &[format!(
            r#"<entry><api:relationship id="1" type="publication-user-authorship">
              <api:related direction="from"><api:object category="user" id="77">
                <api:is-academic>true</api:is-academic>
                <api:is-current-staff>true</api:is-current-staff>
                <api:title>Prof</api:title>
                <api:initials>A</api:initials>
                <api:last-name>{last_name}</api:last-name>
                <api:email-address>a@example.ac.uk</api:email-address>
                <api:primary-group-descriptor>DAMTP</api:primary-group-descriptor>
              </api:object></api:related>
            </api:relationship></entry>"#
        )],
    )
}

/// One arXiv entry.
pub fn arxiv_entry(arxiv_id: &str, title: &str, published: &str) -> String {
    format!(
        r#"<entry>
    <id>http://arxiv.org/abs/{arxiv_id}</id>
    <updated>{published}</updated>
    <published>{published}</published>
    <title>{title}</title>
    <summary>Summary of {title}</summary>
    <author><name>Jane Smith</name></author>
    <link href="http://arxiv.org/abs/{arxiv_id}" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/{arxiv_id}" rel="related" type="application/pdf"/>
  </entry>"#
    )
}

/// An arXiv feed page.
pub fn arxiv_feed(total: u64, entries: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query</title>
  <opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">{total}</opensearch:totalResults>
  <opensearch:startIndex xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">0</opensearch:startIndex>
  {}
</feed>"#,
        entries.concat()
    )
}

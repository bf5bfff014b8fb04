//! arXiv query client.
//!
//! The arXiv API pages by result offset. Offsets are mapped onto 1-based page
//! numbers so the shared driver handles delays, retries and progress.

pub mod parser;

use std::time::Duration;

use chrono::{NaiveDate, Utc};

use super::{FeedPage, HttpFetcher, PageSource, PublicationSource, paginate};
use crate::config::Config;
use crate::error::FetchResult;
use crate::models::{FilterOptions, Publication};
use crate::progress::{ProgressReporter, Provider};

pub use parser::{parse_entry, parse_feed};

/// Client for the arXiv query API.
#[derive(Debug, Clone)]
pub struct ArxivClient {
    http: HttpFetcher,
    base_url: String,
    items_per_page: u32,
    delay: Duration,
    max_attempts: u32,
}

impl ArxivClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> FetchResult<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new(config)?, config))
    }

    /// Create a client sharing an existing transport.
    #[must_use]
    pub fn with_fetcher(http: HttpFetcher, config: &Config) -> Self {
        Self {
            http,
            base_url: config.arxiv_url.clone(),
            items_per_page: config.arxiv_items_per_page.max(1),
            delay: config.arxiv_delay,
            max_attempts: config.empty_page_attempts,
        }
    }
}

/// Build the `search_query` value.
///
/// Clauses are joined with `AND`; the submission window runs from the
/// created-since day to `today`.
#[must_use]
pub fn search_query(options: &FilterOptions, today: NaiveDate) -> String {
    let mut clauses = Vec::new();

    if let Some(department) = options.department {
        clauses.push(format!("cat:{}", department.arxiv_category()));
    }

    let authors: Vec<&str> =
        options.author_ids.iter().map(|a| a.trim()).filter(|a| !a.is_empty()).collect();
    if !authors.is_empty() {
        clauses.push(format!("au:{}", authors.join(",")));
    }

    if let Some(since) = options.created_since {
        clauses.push(format!(
            "submittedDate:[{}0000 TO {}0000]",
            since.format("%Y%m%d"),
            today.format("%Y%m%d")
        ));
    }

    clauses.join(" AND ")
}

struct Pages<'a> {
    client: &'a ArxivClient,
    query: String,
}

#[async_trait::async_trait]
impl PageSource for Pages<'_> {
    fn provider(&self) -> Provider {
        Provider::Arxiv
    }

    fn delay(&self) -> Duration {
        self.client.delay
    }

    fn max_attempts(&self) -> u32 {
        self.client.max_attempts
    }

    async fn fetch_page(&self, page: u32) -> FetchResult<FeedPage> {
        let per_page = self.client.items_per_page;
        let offset = u64::from(page.saturating_sub(1)) * u64::from(per_page);
        let params = [
            ("search_query".to_string(), self.query.clone()),
            ("max_results".to_string(), per_page.to_string()),
            ("start".to_string(), offset.to_string()),
        ];

        let body = self.client.http.get_text(&self.client.base_url, &params).await?;
        let feed = parse_feed(&body, per_page)?;

        tracing::debug!(
            provider = %Provider::Arxiv,
            page,
            offset,
            total_pages = feed.total_pages,
            count = feed.entry_count,
            "Parsed page"
        );
        Ok(feed)
    }
}

#[async_trait::async_trait]
impl PublicationSource for ArxivClient {
    fn provider(&self) -> Provider {
        Provider::Arxiv
    }

    async fn fetch(
        &self,
        options: &FilterOptions,
        progress: &ProgressReporter,
    ) -> FetchResult<Vec<Publication>> {
        let query = search_query(options, Utc::now().date_naive());
        tracing::info!(%query, "Querying arXiv");
        paginate(&Pages { client: self, query }, progress).await
    }
}

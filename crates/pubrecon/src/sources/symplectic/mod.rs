//! Symplectic Elements client.
//!
//! Pages through the institutional publications feed, keeps records from
//! allow-listed sources that match the requested content types, then looks up
//! each record's corresponding author one request at a time.

pub mod fields;
pub mod parser;

use std::time::Duration;

use super::{FeedPage, HttpFetcher, PageSource, PublicationSource, paginate};
use crate::config::{Config, sources};
use crate::error::FetchResult;
use crate::models::{CorrespondingAuthor, FilterOptions, Publication};
use crate::progress::{ProgressReporter, Provider};

pub use parser::{parse_entry, parse_feed, parse_relationships};

/// Client for the Symplectic publications API.
#[derive(Debug, Clone)]
pub struct SymplecticClient {
    http: HttpFetcher,
    base_url: String,
    items_per_page: u32,
    delay: Duration,
    max_attempts: u32,
    decorate_authors: bool,
}

impl SymplecticClient {
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
            base_url: config.symplectic_url.trim_end_matches('/').to_string(),
            items_per_page: config.symplectic_items_per_page,
            delay: config.symplectic_delay,
            max_attempts: config.empty_page_attempts,
            decorate_authors: config.decorate_authors,
        }
    }

    /// Query parameters shared by every page of one fetch.
    fn params(&self, options: &FilterOptions) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(6);
        if let Some(date) = options.created_since {
            params.push((
                "created-since".to_string(),
                format!("{}T00:00:00+01:00", date.format("%Y-%m-%d")),
            ));
        }
        params.push(("detail".to_string(), "full".to_string()));
        params.push(("ever-approved".to_string(), options.ever_approved.to_string()));
        params.push(("per-page".to_string(), self.items_per_page.to_string()));
        if let Some(department) = options.department {
            params.push(("groups".to_string(), department.symplectic_group().to_string()));
        }
        params
    }

    /// Look up the corresponding author of one publication.
    ///
    /// # Errors
    ///
    /// Returns error on transport, parse or provider failure.
    pub async fn corresponding_author(&self, id: &str) -> FetchResult<Option<CorrespondingAuthor>> {
        let url = format!("{}/{id}/relationships", self.base_url);
        let body = self.http.get_text(&url, &[("detail".to_string(), "full".to_string())]).await?;
        parse_relationships(&body)
    }

    /// Attach corresponding authors, strictly one lookup at a time.
    async fn decorate(&self, publications: Vec<Publication>) -> FetchResult<Vec<Publication>> {
        let mut decorated = Vec::with_capacity(publications.len());

        for publication in publications {
            let Some(id) = publication.id.clone() else {
                decorated.push(publication);
                continue;
            };

            tokio::time::sleep(self.delay).await;
            let author = self.corresponding_author(&id).await?;
            tracing::debug!(id = %id, found = author.is_some(), "Corresponding author lookup");
            decorated.push(publication.with_corresponding_author(author));
        }

        Ok(decorated)
    }
}

/// One Symplectic fetch: fixed parameters plus the post-parse filter.
struct Pages<'a> {
    client: &'a SymplecticClient,
    options: &'a FilterOptions,
    params: Vec<(String, String)>,
}

impl Pages<'_> {
    fn keep(&self, publication: &Publication) -> bool {
        let allowed = publication.source.as_deref().is_some_and(|s| sources::ALLOWED.contains(&s));
        allowed && self.options.accepts_type(publication.publication_type)
    }
}

#[async_trait::async_trait]
impl PageSource for Pages<'_> {
    fn provider(&self) -> Provider {
        Provider::Symplectic
    }

    fn delay(&self) -> Duration {
        self.client.delay
    }

    fn max_attempts(&self) -> u32 {
        self.client.max_attempts
    }

    async fn fetch_page(&self, page: u32) -> FetchResult<FeedPage> {
        let mut params = self.params.clone();
        params.push(("page".to_string(), page.to_string()));

        let body = self.client.http.get_text(&self.client.base_url, &params).await?;
        let mut feed = parse_feed(&body)?;
        feed.publications.retain(|p| self.keep(p));

        tracing::debug!(
            provider = %Provider::Symplectic,
            page,
            total_pages = feed.total_pages,
            count = feed.publications.len(),
            "Parsed page"
        );
        Ok(feed)
    }
}

#[async_trait::async_trait]
impl PublicationSource for SymplecticClient {
    fn provider(&self) -> Provider {
        Provider::Symplectic
    }

    async fn fetch(
        &self,
        options: &FilterOptions,
        progress: &ProgressReporter,
    ) -> FetchResult<Vec<Publication>> {
        let pages = Pages { client: self, options, params: self.params(options) };
        let publications = paginate(&pages, progress).await?;

        if self.decorate_authors && !publications.is_empty() {
            tracing::info!(count = publications.len(), "Looking up corresponding authors");
            return self.decorate(publications).await;
        }
        Ok(publications)
    }
}

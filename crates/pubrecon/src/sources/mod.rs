//! Provider clients.
//!
//! Each provider pages through an Atom feed one request at a time:
//! - Fixed delay between consecutive requests (provider-mandated)
//! - Empty pages retried in place up to a cap
//! - Records union-merged into a per-fetch accumulator
//! - A progress event after every completed page

pub mod arxiv;
pub mod symplectic;

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::config::{Config, api};
use crate::error::{FetchError, FetchResult};
use crate::models::{FilterOptions, Publication};
use crate::progress::{ProgressEvent, ProgressReporter, Provider};

pub use arxiv::ArxivClient;
pub use symplectic::SymplecticClient;

/// A provider that can be fetched to completion.
#[async_trait::async_trait]
pub trait PublicationSource: Send + Sync {
    /// Which provider this is.
    fn provider(&self) -> Provider;

    /// Fetch every matching publication, emitting progress per page.
    async fn fetch(
        &self,
        options: &FilterOptions,
        progress: &ProgressReporter,
    ) -> FetchResult<Vec<Publication>>;
}

/// One parsed page of a feed.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    /// Result count reported by the provider.
    pub total_results: u64,

    /// Last page number reported by the provider (0 if absent).
    pub total_pages: u32,

    /// Raw entries on the page, before filtering.
    pub entry_count: usize,

    /// Parsed and filtered publications.
    pub publications: Vec<Publication>,
}

/// A single fetch in progress, addressed by 1-based page number.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Which provider is being paged.
    fn provider(&self) -> Provider;

    /// Delay between consecutive requests.
    fn delay(&self) -> Duration;

    /// Attempts for a page that comes back without entries.
    fn max_attempts(&self) -> u32;

    /// Request and parse one page.
    async fn fetch_page(&self, page: u32) -> FetchResult<FeedPage>;
}

enum PageOutcome {
    NoResults,
    Page(FeedPage),
}

/// Drive a [`PageSource`] from page 1 to the provider's last page.
///
/// Requests are strictly sequential and separated by the source's delay.
pub async fn paginate<S>(source: &S, progress: &ProgressReporter) -> FetchResult<Vec<Publication>>
where
    S: PageSource + ?Sized,
{
    let provider = source.provider();
    let mut accumulator = Accumulator::default();
    let mut page = 1;

    loop {
        let feed = match fetch_with_retry(source, page).await? {
            PageOutcome::NoResults => {
                tracing::info!(%provider, page, "Provider reported no results");
                break;
            }
            PageOutcome::Page(feed) => feed,
        };

        accumulator.extend(feed.publications);
        progress.report(ProgressEvent { provider, current: page, total: feed.total_pages });

        if page >= feed.total_pages {
            break;
        }

        tokio::time::sleep(source.delay()).await;
        page += 1;
    }

    let publications = accumulator.into_vec();
    tracing::info!(%provider, pages = page, count = publications.len(), "Fetch complete");
    Ok(publications)
}

async fn fetch_with_retry<S>(source: &S, page: u32) -> FetchResult<PageOutcome>
where
    S: PageSource + ?Sized,
{
    let provider = source.provider();
    let attempts = source.max_attempts().max(1);

    for attempt in 1..=attempts {
        let feed = source.fetch_page(page).await?;

        if feed.total_results == 0 {
            return Ok(PageOutcome::NoResults);
        }
        if feed.entry_count > 0 {
            return Ok(PageOutcome::Page(feed));
        }

        tracing::warn!(
            %provider,
            page,
            total_pages = feed.total_pages,
            attempt,
            "Provider returned an empty page, retrying"
        );
        if attempt < attempts {
            tokio::time::sleep(source.delay()).await;
        }
    }

    Err(FetchError::EmptyPage { provider, page, attempts })
}

/// Insertion-ordered, duplicate-free publication collection.
#[derive(Debug, Default)]
struct Accumulator {
    ids: HashSet<String>,
    publications: Vec<Publication>,
}

impl Accumulator {
    fn extend(&mut self, publications: Vec<Publication>) {
        for publication in publications {
            let fresh = match &publication.id {
                Some(id) => self.ids.insert(id.clone()),
                None => !self.publications.contains(&publication),
            };
            if fresh {
                self.publications.push(publication);
            }
        }
    }

    fn into_vec(self) -> Vec<Publication> {
        self.publications
    }
}

/// Shared HTTP transport for both providers.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> FetchResult<Self> {
        let client = Client::builder()
            .user_agent(api::USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }

    /// GET `base` with query parameters and return the body text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] on transport failure and
    /// [`FetchError::Status`] on a non-success status. Never retries.
    pub async fn get_text(&self, base: &str, params: &[(String, String)]) -> FetchResult<String> {
        let mut url = Url::parse(base)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let response = Self::handle_response(response).await?;

        Ok(response.text().await?)
    }

    /// Map non-success statuses to errors.
    async fn handle_response(response: reqwest::Response) -> FetchResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(FetchError::status(status.as_u16(), text))
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher").finish()
    }
}

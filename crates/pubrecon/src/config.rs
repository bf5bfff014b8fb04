//! Configuration for the publication importer.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Symplectic Elements host.
    pub const SYMPLECTIC_URI: &str = "https://ref.cam.ac.uk:8091";

    /// Symplectic publications endpoint, relative to the host.
    pub const SYMPLECTIC_ENDPOINT: &str = "publications-api/v4.6/publications";

    /// Records per Symplectic page (the API caps full-detail pages at 25).
    pub const SYMPLECTIC_ITEMS_PER_PAGE: u32 = 25;

    /// Symplectic asks for at least half a second between requests.
    pub const SYMPLECTIC_DELAY: Duration = Duration::from_millis(500);

    /// arXiv query endpoint.
    pub const ARXIV_URI: &str = "http://export.arxiv.org/api/query";

    /// Records per arXiv page.
    pub const ARXIV_ITEMS_PER_PAGE: u32 = 50;

    /// Minimum delay between arXiv requests.
    pub const ARXIV_DELAY: Duration = Duration::from_millis(250);

    /// Attempts made for a page that comes back without entries.
    pub const EMPTY_PAGE_ATTEMPTS: u32 = 10;

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// User agent sent to both providers.
    pub const USER_AGENT: &str = concat!("pubrecon/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP host.
    pub const HTTP_HOST: &str = "localhost";

    /// Default HTTP port.
    pub const HTTP_PORT: u16 = 2000;
}

/// Provider source names.
pub mod sources {
    /// Source name Symplectic uses for hand-entered records.
    pub const MANUAL: &str = "manual";

    /// Normalized name for hand-entered records.
    pub const SYMPLECTIC_MANUAL: &str = "symplectic-manual";

    /// Source name of records harvested from arXiv.
    pub const ARXIV: &str = "arxiv";

    /// Sources that survive filtering, in preferred-record priority order.
    pub const ALLOWED: &[&str] = &[SYMPLECTIC_MANUAL, ARXIV];
}

/// Zendesk custom field ids for the ticket field set.
///
/// Fields without an id are left off the ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFieldIds {
    /// Acceptance date field.
    pub acceptance_date: Option<u64>,

    /// Author comments field.
    pub author_comments: Option<u64>,

    /// Department field.
    pub department: Option<u64>,

    /// Publisher field.
    pub publisher: Option<u64>,
}

/// Zendesk credentials.
#[derive(Clone)]
pub struct ZendeskConfig {
    /// Zendesk instance URI (e.g. `https://example.zendesk.com`).
    pub uri: String,

    /// Agent username (an email address).
    pub username: String,

    /// API token.
    pub token: String,

    /// Custom field ids.
    pub fields: TicketFieldIds,
}

impl std::fmt::Debug for ZendeskConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZendeskConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Importer configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Full Symplectic publications URL (host + endpoint).
    pub symplectic_url: String,

    /// Records per Symplectic page.
    pub symplectic_items_per_page: u32,

    /// Delay between Symplectic requests.
    pub symplectic_delay: Duration,

    /// arXiv query URL.
    pub arxiv_url: String,

    /// Records per arXiv page.
    pub arxiv_items_per_page: u32,

    /// Delay between arXiv requests.
    pub arxiv_delay: Duration,

    /// Attempts for a page that unexpectedly has no entries.
    pub empty_page_attempts: u32,

    /// Whether Symplectic records get their corresponding author attached.
    pub decorate_authors: bool,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Zendesk settings, when ticketing is enabled.
    pub zendesk: Option<ZendeskConfig>,
}

impl Config {
    /// Create the production configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            symplectic_url: format!("{}/{}", api::SYMPLECTIC_URI, api::SYMPLECTIC_ENDPOINT),
            symplectic_items_per_page: api::SYMPLECTIC_ITEMS_PER_PAGE,
            symplectic_delay: api::SYMPLECTIC_DELAY,
            arxiv_url: api::ARXIV_URI.to_string(),
            arxiv_items_per_page: api::ARXIV_ITEMS_PER_PAGE,
            arxiv_delay: api::ARXIV_DELAY,
            empty_page_attempts: api::EMPTY_PAGE_ATTEMPTS,
            decorate_authors: true,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            zendesk: None,
        }
    }

    /// Create a test configuration with custom URLs for mock servers.
    ///
    /// Symplectic lives under `/publications`, arXiv under `/api/query` and
    /// Zendesk at the server root.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            symplectic_url: format!("{}/publications", base_url),
            symplectic_items_per_page: api::SYMPLECTIC_ITEMS_PER_PAGE,
            symplectic_delay: Duration::from_millis(0), // No delay in tests
            arxiv_url: format!("{}/api/query", base_url),
            arxiv_items_per_page: 10,
            arxiv_delay: Duration::from_millis(0),
            empty_page_attempts: api::EMPTY_PAGE_ATTEMPTS,
            decorate_authors: false,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            zendesk: Some(ZendeskConfig {
                uri: base_url.to_string(),
                username: "agent@example.com".to_string(),
                token: "test-token".to_string(),
                fields: TicketFieldIds::default(),
            }),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a URL or field id is malformed.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new();

        if let Ok(value) = std::env::var("SYMPLECTIC_URL") {
            url::Url::parse(&value)?;
            config.symplectic_url = value;
        }
        if let Ok(value) = std::env::var("ARXIV_URL") {
            url::Url::parse(&value)?;
            config.arxiv_url = value;
        }

        let uri = std::env::var("ZENDESK_URI").ok().filter(|v| !v.is_empty());
        if let Some(uri) = uri {
            url::Url::parse(&uri)?;
            config.zendesk = Some(ZendeskConfig {
                uri,
                username: std::env::var("ZENDESK_USERNAME").unwrap_or_default(),
                token: std::env::var("ZENDESK_TOKEN").unwrap_or_default(),
                fields: TicketFieldIds {
                    acceptance_date: field_id("ZENDESK_FIELD_ACCEPTANCE_DATE")?,
                    author_comments: field_id("ZENDESK_FIELD_AUTHOR_COMMENTS")?,
                    department: field_id("ZENDESK_FIELD_DEPARTMENT")?,
                    publisher: field_id("ZENDESK_FIELD_PUBLISHER")?,
                },
            });
        }

        Ok(config)
    }

    /// Check if ticketing is configured.
    #[must_use]
    pub const fn has_ticketing(&self) -> bool {
        self.zendesk.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn field_id(var: &str) -> anyhow::Result<Option<u64>> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Ok(Some(value.parse()?)),
        _ => Ok(None),
    }
}

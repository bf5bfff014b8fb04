//! Error types for the publication importer.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::progress::Provider;

/// Errors from fetching and parsing provider feeds.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// HTTP transport error (connection, DNS, TLS, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success HTTP status
    #[error("Unexpected status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Response body is not a readable feed
    #[error("{0}")]
    Parse(String),

    /// Error element embedded in an otherwise successful response
    #[error("{message}")]
    Provider {
        /// The provider's own error message
        message: String,
    },

    /// A page kept coming back without entries
    #[error("Unable to fetch {provider} publications: page {page} stayed empty after {attempts} attempts")]
    EmptyPage {
        /// Provider that returned the empty page
        provider: Provider,
        /// Page number (1-based)
        page: u32,
        /// Attempts made
        attempts: u32,
    },
}

impl FetchError {
    /// Create the generic parse error.
    #[must_use]
    pub fn parse() -> Self {
        Self::Parse("Could not parse XML".to_string())
    }

    /// Create a provider error from the provider's message.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider { message: message.into() }
    }

    /// Create a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status { status, message: message.into() }
    }

    /// Returns true for failures of the network layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}

/// Errors from the ticketing adapter.
#[derive(thiserror::Error, Debug)]
pub enum TicketError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Zendesk rejected the ticket
    #[error("Error while creating ZenDesk ticket ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Ticketing is not configured
    #[error("ZenDesk is not configured")]
    NotConfigured,
}

/// Errors surfaced by the HTTP and CLI boundary.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Caller-supplied filter is malformed
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// Offending parameter
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Fetching from a provider failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Ticket creation failed
    #[error(transparent)]
    Ticket(#[from] TicketError),

    /// Unknown publication id
    #[error("Publication not found: {0}")]
    NotFound(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Serialization(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Request failed");
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type alias for ticket operations.
pub type TicketResult<T> = Result<T, TicketError>;

/// Result type alias for boundary operations.
pub type ApiResult<T> = Result<T, ApiError>;

//! HTTP front end.
//!
//! Thin axum layer over the source clients: validates query parameters,
//! runs fetches and remembers the last Symplectic result for ticket requests.

pub mod routes;

use std::sync::Arc;

use crate::config::Config;
use crate::sources::{ArxivClient, HttpFetcher, SymplecticClient};
use crate::tickets::ZendeskClient;

pub use routes::{AppState, create_router};

/// HTTP server for the importer.
#[derive(Debug)]
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a server with clients built from `config`.
    ///
    /// Ticketing is enabled only when Zendesk is configured.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = HttpFetcher::new(config)?;
        let symplectic = SymplecticClient::with_fetcher(http.clone(), config);
        let arxiv = ArxivClient::with_fetcher(http, config);
        let tickets = if config.has_ticketing() { Some(ZendeskClient::new(config)?) } else { None };

        Ok(Self { state: Arc::new(AppState::new(Arc::new(symplectic), Arc::new(arxiv), tickets)) })
    }

    /// Run until interrupted.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run(self, host: &str, port: u16) -> anyhow::Result<()> {
        let router = create_router(self.state);
        let listener = tokio::net::TcpListener::bind((host, port)).await?;

        tracing::info!("HTTP server listening on http://{}", listener.local_addr()?);
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}

//! pubrecon
//!
//! Imports publication records from a Symplectic Elements institutional
//! repository and from the arXiv preprint feed, normalizes both into one
//! [`Publication`] model and reconciles arXiv records against the
//! institutional ones.
//!
//! # Features
//!
//! - **Polite pagination**: one request at a time with the provider's minimum delay
//! - **Empty-page retries**: flaky empty pages are retried in place up to a cap
//! - **Author decoration**: corresponding authors looked up per record
//! - **Reconciliation**: arXiv identifier and title heuristics
//!
//! # Example
//!
//! ```no_run
//! use pubrecon::{Config, FilterOptions, ProgressReporter, SymplecticClient};
//! use pubrecon::sources::PublicationSource;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = SymplecticClient::new(&config)?;
//!
//!     let publications = client
//!         .fetch(&FilterOptions::default(), &ProgressReporter::disabled())
//!         .await?;
//!     println!("{} publications", publications.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod reconcile;
pub mod server;
pub mod sources;
pub mod tickets;
pub mod xml;

pub use config::Config;
pub use error::{ApiError, FetchError, TicketError};
pub use models::{FilterOptions, FilterQuery, Publication, PublicationType};
pub use progress::{ProgressEvent, ProgressReporter, Provider};
pub use sources::{ArxivClient, SymplecticClient};

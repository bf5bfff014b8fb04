//! pubrecon - Entry Point
//!
//! Serves the HTTP front end, or runs a single import or comparison and
//! writes the result as JSON.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pubrecon::{
    ArxivClient, Config, FilterQuery, ProgressReporter, SymplecticClient, export,
    pipeline, server::Server, sources::{HttpFetcher, PublicationSource},
};

#[derive(Parser, Debug)]
#[command(name = "pubrecon")]
#[command(about = "Import publications from Symplectic and arXiv and reconcile them")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP front end
    Serve {
        /// Interface to bind
        #[arg(long, default_value = pubrecon::config::api::HTTP_HOST, env = "HOST")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value_t = pubrecon::config::api::HTTP_PORT, env = "PORT")]
        port: u16,
    },

    /// Fetch Symplectic publications into DIR/publications.json
    Import(Filters),

    /// Reconcile arXiv against Symplectic into DIR/reconciliation.json
    Compare {
        #[command(flatten)]
        filters: Filters,

        /// Comma-separated arXiv author ids
        #[arg(short = 'a', long)]
        author_ids: Option<String>,
    },
}

#[derive(Args, Debug)]
struct Filters {
    /// Existing directory the JSON file is written to
    #[arg(short = 'd', long)]
    target_dir: PathBuf,

    /// Department (astro_physics, mathematics)
    #[arg(short = 'g', long)]
    groups: Option<String>,

    /// Only records created since YYYY-MM-DD
    #[arg(short = 'c', long)]
    created_since: Option<String>,

    /// Only records ever approved (true, false)
    #[arg(short = 'e', long)]
    ever_approved: Option<String>,

    /// Comma-separated publication types
    #[arg(short = 't', long)]
    content_types: Option<String>,
}

impl Filters {
    /// Fail before fetching when the output directory is missing.
    fn ensure_target_dir(&self) -> anyhow::Result<()> {
        if !self.target_dir.is_dir() {
            anyhow::bail!("{} is not an existing directory", self.target_dir.display());
        }
        Ok(())
    }

    fn query(&self, author_ids: Option<String>) -> FilterQuery {
        FilterQuery {
            created_since: self.created_since.clone(),
            ever_approved: self.ever_approved.clone(),
            groups: self.groups.clone(),
            content_types: self.content_types.clone(),
            author_ids,
        }
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting pubrecon");

    let config = Config::from_env()?;

    match cli.command {
        Command::Serve { host, port } => {
            Server::new(&config)?.run(&host, port).await?;
        }
        Command::Import(filters) => {
            filters.ensure_target_dir()?;
            let options = filters.query(None).validate()?;
            let client = SymplecticClient::new(&config)?;
            let publications = client.fetch(&options, &ProgressReporter::logging()).await?;

            tracing::info!(count = publications.len(), "Import finished");
            export::write_json(&filters.target_dir, "publications.json", &publications)?;
        }
        Command::Compare { filters, author_ids } => {
            filters.ensure_target_dir()?;
            let options = filters.query(author_ids).validate()?;
            let http = HttpFetcher::new(&config)?;
            let arxiv = ArxivClient::with_fetcher(http.clone(), &config);
            let symplectic = SymplecticClient::with_fetcher(http, &config);

            let outcome =
                pipeline::search(&arxiv, &symplectic, &options, &ProgressReporter::logging())
                    .await?;

            tracing::info!(
                matching = outcome.report.stats.matching_count,
                unmatching = outcome.report.unmatching.len(),
                "Comparison finished"
            );
            export::write_json(&filters.target_dir, "reconciliation.json", &outcome.report)?;
        }
    }

    Ok(())
}

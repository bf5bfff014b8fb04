//! Zendesk ticket submission.
//!
//! One ticket per publication, submitted strictly one after the other.

use reqwest::Client;
use serde::Serialize;

use crate::config::{Config, TicketFieldIds, ZendeskConfig, api};
use crate::error::{TicketError, TicketResult};
use crate::models::Publication;

/// Zendesk ticket payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticket {
    pub subject: String,
    pub comment: TicketComment,
    pub custom_fields: Vec<CustomField>,
}

/// Ticket description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketComment {
    pub body: String,
}

/// A custom field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomField {
    pub id: u64,
    pub value: String,
}

#[derive(Serialize)]
struct TicketEnvelope<'a> {
    ticket: &'a Ticket,
}

impl Ticket {
    /// Build the ticket for a publication.
    ///
    /// Custom fields without a configured id, or without a value on the
    /// publication, are left off.
    #[must_use]
    pub fn for_publication(publication: &Publication, fields: &TicketFieldIds) -> Self {
        let department = publication
            .corresponding_author
            .as_ref()
            .and_then(|a| a.primary_group_descriptor.clone());

        let custom_fields = [
            (fields.acceptance_date, publication.date_string()),
            (fields.author_comments, publication.comments.clone()),
            (fields.department, department),
            (fields.publisher, publication.publisher.clone()),
        ]
        .into_iter()
        .filter_map(|(id, value)| Some(CustomField { id: id?, value: value? }))
        .collect();

        Self {
            subject: publication.title_or_default().to_string(),
            comment: TicketComment { body: describe(publication) },
            custom_fields,
        }
    }
}

fn describe(publication: &Publication) -> String {
    let mut body = format!("Publication: {}\n", publication.title_or_default());
    body.push_str(&format!("Type: {}\n", publication.publication_type));
    if let Some(id) = &publication.id {
        body.push_str(&format!("Symplectic id: {id}\n"));
    }
    if !publication.authors.is_empty() {
        body.push_str(&format!("Authors: {}\n", publication.authors.join(", ")));
    }
    if let Some(author) = &publication.corresponding_author {
        body.push_str(&format!("Corresponding author: {}", author.academic_name));
        if let Some(email) = &author.email_address {
            body.push_str(&format!(" <{email}>"));
        }
        body.push('\n');
    }
    if let Some(file) = &publication.file {
        body.push_str(&format!("File: {file}\n"));
    }
    body
}

/// Look a publication up by id in a completed fetch.
#[must_use]
pub fn find_publication<'a>(publications: &'a [Publication], id: &str) -> Option<&'a Publication> {
    publications.iter().find(|p| p.id.as_deref() == Some(id))
}

/// Zendesk API client.
#[derive(Clone)]
pub struct ZendeskClient {
    client: Client,
    config: ZendeskConfig,
}

impl ZendeskClient {
    /// Create a client from the ticketing settings.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::NotConfigured`] without Zendesk settings, or an
    /// HTTP error if client initialization fails.
    pub fn new(config: &Config) -> TicketResult<Self> {
        let zendesk = config.zendesk.clone().ok_or(TicketError::NotConfigured)?;
        let client = Client::builder()
            .user_agent(api::USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { client, config: zendesk })
    }

    /// Submit one ticket per publication, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failed submission.
    pub async fn create_tickets(&self, publications: &[Publication]) -> TicketResult<()> {
        for publication in publications {
            let ticket = Ticket::for_publication(publication, &self.config.fields);
            self.submit(&ticket).await?;
            tracing::info!(id = ?publication.id, "Ticket created");
        }
        Ok(())
    }

    async fn submit(&self, ticket: &Ticket) -> TicketResult<()> {
        let url = format!("{}/api/v2/tickets.json", self.config.uri.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .basic_auth(format!("{}/token", self.config.username), Some(&self.config.token))
            .json(&TicketEnvelope { ticket })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(TicketError::Rejected { status: status.as_u16(), message })
    }
}

impl std::fmt::Debug for ZendeskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZendeskClient").field("config", &self.config).finish()
    }
}

//! HTTP routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResult, TicketError};
use crate::models::{FilterQuery, Publication, ReconciliationReport};
use crate::pipeline;
use crate::progress::ProgressReporter;
use crate::sources::PublicationSource;
use crate::tickets::{ZendeskClient, find_publication};

/// Shared state for HTTP handlers.
pub struct AppState {
    pub symplectic: Arc<dyn PublicationSource>,
    pub arxiv: Arc<dyn PublicationSource>,
    pub tickets: Option<ZendeskClient>,

    /// Symplectic records from the last completed fetch, for ticket lookups.
    pub last_fetch: RwLock<Vec<Publication>>,
}

impl AppState {
    /// Create state with an empty last fetch.
    #[must_use]
    pub fn new(
        symplectic: Arc<dyn PublicationSource>,
        arxiv: Arc<dyn PublicationSource>,
        tickets: Option<ZendeskClient>,
    ) -> Self {
        Self { symplectic, arxiv, tickets, last_fetch: RwLock::new(Vec::new()) }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").field("tickets", &self.tickets.is_some()).finish()
    }
}

/// Body of a ticket request.
#[derive(Debug, Deserialize)]
pub struct TicketRequest {
    pub id: String,
}

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/publications", get(handle_publications))
        .route("/api/search", get(handle_search))
        .route("/api/zendesk/ticket", post(handle_ticket))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pubrecon",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /api/publications`: fetch from Symplectic.
async fn handle_publications(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Json<Vec<Publication>>> {
    let options = query.validate()?;
    let publications = state.symplectic.fetch(&options, &ProgressReporter::logging()).await?;

    *state.last_fetch.write().await = publications.clone();
    Ok(Json(publications))
}

/// `GET /api/search`: arXiv and Symplectic, reconciled.
async fn handle_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> ApiResult<Json<ReconciliationReport>> {
    let options = query.validate()?;
    let outcome = pipeline::search(
        state.arxiv.as_ref(),
        state.symplectic.as_ref(),
        &options,
        &ProgressReporter::logging(),
    )
    .await?;

    if let Some(institutional) = outcome.institutional {
        *state.last_fetch.write().await = institutional;
    }
    Ok(Json(outcome.report))
}

/// `POST /api/zendesk/ticket`: one ticket for a previously fetched record.
async fn handle_ticket(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TicketRequest>,
) -> ApiResult<(StatusCode, &'static str)> {
    let tickets = state.tickets.as_ref().ok_or(TicketError::NotConfigured)?;

    let publication = {
        let last_fetch = state.last_fetch.read().await;
        find_publication(&last_fetch, &request.id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(request.id.clone()))?
    };

    tickets.create_tickets(std::slice::from_ref(&publication)).await?;
    Ok((StatusCode::OK, "OK"))
}

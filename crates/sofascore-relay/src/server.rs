//! Axum HTTP server: router, listener, graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::proxy::correlation::{self, REQUEST_ID_HEADER};
use crate::proxy::upstream;
use crate::routes::RouteTable;

/// Shared, read-only application state.
pub struct AppState {
    pub config: RelayConfig,
    pub routes: RouteTable,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn from_config(config: RelayConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream.timeout_secs))
            .build()?;
        let routes = RouteTable::new(&config.upstream.base_url);

        Ok(Self {
            config,
            routes,
            client,
        })
    }
}

/// Query string of `GET /api/sofascore`.
#[derive(Debug, Deserialize)]
pub struct SportQuery {
    pub sport: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sofascore", get(handle_sofascore))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Build and run the HTTP server.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let listen_addr = state.config.server.listen_address();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(address = %listen_addr, "Relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Relay shut down gracefully");
    Ok(())
}

/// Handler for GET /api/sofascore.
///
/// A missing, empty, unknown, or unparseable `sport` is rejected before any
/// outbound call. Otherwise exactly one fetch is made.
async fn handle_sofascore(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SportQuery>, QueryRejection>,
) -> Response {
    let request_id = correlation::generate_id();
    let selector = query.ok().and_then(|Query(q)| q.sport);

    let span = relay_tracing::relay_request_span!(
        &request_id,
        selector.as_deref().unwrap_or("-")
    );

    let mut response = async {
        match relay(&state, selector.as_deref(), &request_id).await {
            Ok(response) => {
                tracing::Span::current().record("outcome", "relayed");
                response
            }
            Err(e) => {
                let outcome = match &e {
                    RelayError::InvalidSelector => {
                        tracing::debug!("Rejected request with invalid sport selector");
                        "rejected"
                    }
                    RelayError::UpstreamFailure(source) => {
                        tracing::error!(error = %source, "Error fetching data from SofaScore");
                        "failed"
                    }
                };
                tracing::Span::current().record("outcome", outcome);
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

async fn relay(
    state: &AppState,
    selector: Option<&str>,
    request_id: &str,
) -> Result<Response, RelayError> {
    let (sport, url) = state.routes.resolve(selector)?;
    tracing::Span::current().record("sport", sport.as_str());
    upstream::fetch(&state.client, url, &state.config.upstream.user_agent, request_id).await
}

/// Health check endpoint.
async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Wait for SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler, shutdown only by kill");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

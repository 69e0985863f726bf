// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the poast board service.
//!
//! `GET /poast` serves the cached board, answering `304 Not Modified` when
//! the client already holds the current version. `POST /poast` stores a
//! poast and answers with the full updated board. Other methods get `405`.

use crate::board::Board;
use crate::cache::{CacheEntry, CacheLookup, FreshnessToken};
use crate::config::Config;
use crate::error::BoardError;
use crate::metrics::BoardMetrics;
use crate::store::PoastRequest;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::services::ServeFile;
use tracing::{debug, info, warn};

/// Shared application state.
pub struct AppState {
    pub board: Board,
    pub metrics: BoardMetrics,
    pub config: Config,
}

impl AppState {
    /// Build the state for a fresh, empty board.
    pub fn new(config: Config) -> prometheus::Result<Self> {
        Ok(Self {
            board: Board::new(&config.board),
            metrics: BoardMetrics::new()?,
            config,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub poasts: usize,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route(
            "/poast",
            get(list_poasts)
                .post(submit_poast)
                .fallback(method_not_allowed),
        )
        .route_service("/client.html", ServeFile::new(state.config.client_html_path()))
        .route("/health", get(health))
        .route("/healthz", get(health));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.with_state(state)
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "poast-board",
        version: env!("CARGO_PKG_VERSION"),
        poasts: state.board.len().await,
    })
}

/// Serve the board, or `304` when a presented token is current.
pub async fn list_poasts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, BoardError> {
    let presented = presented_tokens(&headers);

    match state.board.fetch(&presented).await? {
        CacheLookup::NotModified(token) => {
            debug!(token = token.as_u64(), "Client copy is current");
            state.metrics.not_modified.inc();
            Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, token.to_string())]).into_response())
        }
        CacheLookup::Hit(entry) => Ok(poasts_response(entry)),
        CacheLookup::Built(entry) => {
            state.metrics.cache_rebuilds.inc();
            Ok(poasts_response(entry))
        }
    }
}

/// Store a poast and answer with the updated board.
///
/// The body is parsed as JSON whatever the declared content type.
pub async fn submit_poast(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, BoardError> {
    let request: PoastRequest = serde_json::from_slice(&body).map_err(|err| {
        warn!(error = %err, "Error parsing poast");
        state.metrics.poasts_rejected.inc();
        BoardError::MalformedPoast(err.to_string())
    })?;

    let submission = state.board.submit(&request.username, &request.poast).await?;

    state.metrics.poasts_submitted.inc();
    state.metrics.cache_rebuilds.inc();
    state.metrics.poasts_stored.set(submission.stored as i64);
    info!(
        username = %submission.poast.username,
        poasted = %submission.poast.poasted,
        stored = submission.stored,
        "New poast"
    );

    Ok(poasts_response(submission.entry))
}

/// Any other method on `/poast`.
pub async fn method_not_allowed(method: Method) -> BoardError {
    debug!(%method, "Unsupported method on /poast");
    BoardError::MethodNotAllowed(method)
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response, BoardError> {
    let (content_type, body) = state.metrics.encode()?;
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

fn poasts_response(entry: CacheEntry) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, entry.token.to_string()),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        entry.body,
    )
        .into_response()
}

/// Tokens the client claims to hold.
///
/// Read from `If-None-Match`. The `etag` request header is also accepted,
/// since that is where the client of the earlier board server sent its token.
fn presented_tokens(headers: &HeaderMap) -> Vec<FreshnessToken> {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .chain(headers.get_all(header::ETAG).iter())
        .filter_map(|value| value.to_str().ok())
        .flat_map(FreshnessToken::parse_list)
        .collect()
}

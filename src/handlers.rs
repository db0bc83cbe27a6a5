//! HTTP request handlers.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::TokenRecord;
use crate::gate::{self, TokenStatus};
use crate::metrics::METRICS;
use crate::response::{HealthResponse, TokenMetadata};
use crate::state::AppState;
use crate::Error;

/// Landing page.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../public/index.html"))
}

/// Health check with supply and catalog gauges.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        total_supply: state.supply.current(),
        catalog_records: state.catalog.len(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        requests: state.request_count.load(Ordering::Relaxed),
        rpc: state.chain.primary_url().to_string(),
    })
}

/// Prometheus metrics in text exposition format.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = METRICS.render(state.supply.current(), state.catalog.len());
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

/// Metadata document for one token.
pub async fn token_metadata(
    State(state): State<Arc<AppState>>,
    Path(token_id): Path<i64>,
) -> Result<Json<TokenMetadata>, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    METRICS.http_requests.fetch_add(1, Ordering::Relaxed);

    let record = lookup_available(&state, token_id)?;
    METRICS.metadata_served.fetch_add(1, Ordering::Relaxed);

    Ok(Json(TokenMetadata::build(
        record,
        token_id as u64,
        &state.config.public_base_url,
    )))
}

/// Image bytes for one token, streamed from the object store.
pub async fn image_asset(
    State(state): State<Arc<AppState>>,
    Path(token_id): Path<i64>,
) -> Result<Response, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    METRICS.http_requests.fetch_add(1, Ordering::Relaxed);

    let record = lookup_available(&state, token_id)?;
    let key = asset_key(&state.config.assets_prefix, &record.image);
    stream_asset(&state, key, state.config.image_content_type.clone()).await
}

/// Video bytes for one token. A record without a video yields 404, which is
/// distinct from the not-yet-minted rejection.
pub async fn video_asset(
    State(state): State<Arc<AppState>>,
    Path(token_id): Path<i64>,
) -> Result<Response, Error> {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    METRICS.http_requests.fetch_add(1, Ordering::Relaxed);

    let record = lookup_available(&state, token_id)?;
    let video = record
        .video
        .as_ref()
        .ok_or(Error::AssetNotFound(token_id))?;
    let key = asset_key(&state.config.assets_prefix, video);
    stream_asset(&state, key, state.config.video_content_type.clone()).await
}

/// Gate a requested token ID against the current supply, then resolve its
/// catalog record. Runs before any object-store access.
fn lookup_available(state: &AppState, token_id: i64) -> Result<&TokenRecord, Error> {
    let supply = state.supply.current();
    match gate::classify(token_id, supply) {
        TokenStatus::Invalid => {
            METRICS.gate_invalid.fetch_add(1, Ordering::Relaxed);
            Err(Error::InvalidToken(token_id))
        }
        TokenStatus::NotYetMinted => {
            METRICS.gate_not_minted.fetch_add(1, Ordering::Relaxed);
            info!(token_id, supply, "Rejected request for unminted token");
            Err(Error::NotYetMinted {
                requested: token_id,
                supply,
            })
        }
        TokenStatus::Available => state.catalog.record(token_id as u64).ok_or_else(|| {
            Error::Internal(format!("catalog has no record for minted token {token_id}"))
        }),
    }
}

/// Namespace a catalog storage key under the assets prefix.
fn asset_key(prefix: &str, key: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), key)
}

/// Open an object-store stream and pipe it through as the response body.
///
/// The response is committed as soon as the stream opens; a chunk error after
/// that point is logged and counted as an upstream failure and the connection
/// terminates, since the status line is already on the wire. The underlying
/// stream is dropped with the body on every exit path, including client
/// disconnect.
async fn stream_asset(
    state: &AppState,
    key: String,
    content_type: String,
) -> Result<Response, Error> {
    let stream = state.storage.open_read_stream(&key).await?;
    METRICS.assets_served.fetch_add(1, Ordering::Relaxed);

    let stream = stream.map(move |chunk| {
        if let Err(e) = &chunk {
            METRICS.storage_stream_errors.fetch_add(1, Ordering::Relaxed);
            warn!(key = %key, error = %e, "Object stream failed mid-transfer");
        }
        chunk
    });

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from_stream(stream))
        .map_err(|e| Error::Internal(format!("failed to build asset response: {e}")))
}

//! HTTP-level gating behavior: every route consults the tracked supply
//! before touching the catalog or the object store.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceExt;

use gallery_metadata::catalog::{Catalog, TokenRecord};
use gallery_metadata::chain::ChainClient;
use gallery_metadata::state::AppState;
use gallery_metadata::storage::BlobStore;
use gallery_metadata::supply::SupplyTracker;
use gallery_metadata::{create_router, Config};

const BASE_URL: &str = "https://gallery.example";

fn test_record(n: u64, video: bool) -> TokenRecord {
    TokenRecord {
        name: format!("Piece #{n}"),
        description: format!("piece number {n}"),
        attributes: vec![serde_json::json!({"trait_type": "Edition", "value": n})],
        image: format!("piece-{n}.png"),
        video: video.then(|| format!("piece-{n}.mp4")),
    }
}

/// State over a ten-record catalog. Token 3 has a video, token 10 does not.
/// Chain and store endpoints are unroutable: metadata requests never reach
/// them, and asset requests must fail as upstream errors.
fn test_state(supply: u64) -> Arc<AppState> {
    let mut config = Config::default();
    config.public_base_url = BASE_URL.into();

    let records = (1..=10).map(|n| test_record(n, n == 3)).collect();

    Arc::new(AppState {
        catalog: Catalog::from_records(records),
        supply: SupplyTracker::new(supply),
        chain: ChainClient::new(
            "http://127.0.0.1:1",
            "http://127.0.0.1:2",
            &config.contract_address,
        )
        .unwrap(),
        storage: BlobStore::new("http://127.0.0.1:1").unwrap(),
        start_time: Instant::now(),
        request_count: AtomicU64::new(0),
        config,
    })
}

async fn send(state: &Arc<AppState>, uri: &str) -> Response {
    create_router(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_token_at_supply_boundary_is_served() {
    let state = test_state(10);
    let response = send(&state, "/api/token/10").await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc = json_body(response).await;
    assert_eq!(doc["name"], "Piece #10");
    assert_eq!(doc["image"], format!("{BASE_URL}/assets/images/10"));
    assert!(doc.get("animation_url").is_none());
}

#[tokio::test]
async fn test_token_beyond_supply_is_forbidden() {
    let state = test_state(10);
    let response = send(&state, "/api/token/11").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_nonpositive_token_ids_are_not_found() {
    let state = test_state(10);
    assert_eq!(
        send(&state, "/api/token/0").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        send(&state, "/api/token/-1").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_video_token_links_its_animation() {
    let state = test_state(10);
    let response = send(&state, "/api/token/3").await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc = json_body(response).await;
    assert_eq!(doc["animation_url"], format!("{BASE_URL}/assets/videos/3"));
}

#[tokio::test]
async fn test_video_endpoint_without_video_is_not_found() {
    let state = test_state(10);
    let response = send(&state, "/assets/videos/10").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_asset_routes_gate_like_metadata_routes() {
    let state = test_state(10);
    assert_eq!(
        send(&state, "/assets/images/0").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        send(&state, "/assets/images/11").await.status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        send(&state, "/assets/videos/-4").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_unreachable_store_is_an_upstream_error() {
    let state = test_state(10);
    let response = send(&state, "/assets/images/1").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_supply_raised_by_mint_unlocks_new_token() {
    let state = test_state(4);
    assert_eq!(
        send(&state, "/api/token/5").await.status(),
        StatusCode::FORBIDDEN
    );

    state.supply.apply_observed_mint(5);
    assert_eq!(send(&state, "/api/token/5").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_supply_and_catalog() {
    let state = test_state(7);
    let response = send(&state, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["total_supply"], 7);
    assert_eq!(body["catalog_records"], 10);
}

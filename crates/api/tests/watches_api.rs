use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tokio::sync::RwLock;
use tower::ServiceExt;

use api::{app, AppState};
use common::LoopState;
use registry::WatchRegistry;

const TOKEN: &str = "test-token";

fn state(dir: &tempfile::TempDir) -> AppState {
    let registry = WatchRegistry::open(dir.path().join("watches.json")).unwrap();
    AppState {
        registry: Arc::new(RwLock::new(registry)),
        loop_state: Arc::new(RwLock::new(LoopState::Idle)),
        api_token: TOKEN.to_string(),
    }
}

fn add_request(body: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/watches")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

const VALID_BODY: &str = r#"{
    "symbol": "AAPL",
    "interval": "1d",
    "calculation_method": "CLOSE",
    "period": 20,
    "check_condition": "greater",
    "webhook_url": "https://discord.com/api/webhooks/x"
}"#;

#[tokio::test]
async fn add_without_token_is_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(&dir);

    let resp = app(state.clone())
        .oneshot(add_request(VALID_BODY, None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(state.registry.read().await.is_empty());
}

#[tokio::test]
async fn add_with_token_creates_watch() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(&dir);

    let resp = app(state.clone())
        .oneshot(add_request(VALID_BODY, Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let registry = state.registry.read().await;
    let spec = registry.get("AAPL").unwrap();
    assert_eq!(spec.period, 20);
    assert!(spec.active);
}

#[tokio::test]
async fn zero_period_is_a_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(&dir);

    let body = VALID_BODY.replace("\"period\": 20", "\"period\": 0");
    let resp = app(state.clone())
        .oneshot(add_request(&body, Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(state.registry.read().await.is_empty());
}

#[tokio::test]
async fn unknown_interval_is_a_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(&dir);

    let body = VALID_BODY.replace("\"interval\": \"1d\"", "\"interval\": \"2h\"");
    let resp = app(state.clone())
        .oneshot(add_request(&body, Some(TOKEN)))
        .await
        .unwrap();

    // Rejected at the deserialization edge, before the registry sees it
    assert!(resp.status().is_client_error());
    assert!(state.registry.read().await.is_empty());
}

#[tokio::test]
async fn remove_deletes_watch_and_tolerates_absent_symbols() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(&dir);

    app(state.clone())
        .oneshot(add_request(VALID_BODY, Some(TOKEN)))
        .await
        .unwrap();

    let delete = |uri: &str| {
        Request::builder()
            .method("DELETE")
            .uri(uri.to_string())
            .header("Authorization", format!("Bearer {TOKEN}"))
            .body(Body::empty())
            .unwrap()
    };

    let resp = app(state.clone()).oneshot(delete("/api/watches/AAPL")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(state.registry.read().await.is_empty());

    // Removing a symbol that is not there is a no-op, not an error
    let resp = app(state.clone()).oneshot(delete("/api/watches/AAPL")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn deactivate_keeps_watch_but_marks_inactive() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(&dir);

    app(state.clone())
        .oneshot(add_request(VALID_BODY, Some(TOKEN)))
        .await
        .unwrap();

    let resp = app(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/watches/AAPL/deactivate")
                .header("Authorization", format!("Bearer {TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let registry = state.registry.read().await;
    assert!(!registry.get("AAPL").unwrap().active);
}

#[tokio::test]
async fn healthz_needs_no_token() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(&dir);

    let resp = app(state)
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

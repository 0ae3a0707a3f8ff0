#![cfg(feature = "server")]

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use catmash_arena::{Arena, api, init};
use catmash_content::{CatEntry, ContentError, ContentSource};
use catmash_kernel::domain::config::ApiConfig;
use catmash_kernel::server::ApiState;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::timeout;
use tower::ServiceExt;

/// Serves whatever was last put into it, or fails when emptied.
#[derive(Debug)]
struct MemorySource {
    entries: Mutex<Option<Vec<CatEntry>>>,
}

impl MemorySource {
    fn with_cats(count: usize) -> Arc<Self> {
        Arc::new(Self { entries: Mutex::new(Some(entries(0..count))) })
    }

    fn set(&self, entries: Option<Vec<CatEntry>>) {
        *self.entries.lock() = entries;
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn fetch_entries(&self) -> Result<Vec<CatEntry>, ContentError> {
        self.entries.lock().clone().ok_or(ContentError::Status { status: 503, context: None })
    }
}

/// Parks every fetch once armed, until the test releases it.
#[derive(Debug, Default)]
struct GatedSource {
    armed: AtomicBool,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl ContentSource for GatedSource {
    async fn fetch_entries(&self) -> Result<Vec<CatEntry>, ContentError> {
        if self.armed.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok(entries(0..3))
    }
}

fn entries(range: std::ops::Range<usize>) -> Vec<CatEntry> {
    range
        .map(|i| CatEntry {
            id: format!("cat-{i}"),
            title: format!("Cat {i}"),
            image: format!("https://img/{i}.png"),
        })
        .collect()
}

async fn app(source: Arc<dyn ContentSource>) -> (Router, ApiState) {
    let cfg = ApiConfig::default();
    let slice = init(&cfg, source).await.expect("initial sync");
    let state = ApiState::builder().config(cfg).register_slice(slice).build().expect("state");

    let (router, _) = api::router().with_state(state.clone()).split_for_parts();
    (router, state)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        },
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

fn ratings(state: &ApiState) -> Vec<i32> {
    let arena = state.try_get_slice::<Arena>().unwrap();
    arena.registry.all().into_iter().map(|c| c.rating).collect()
}

#[tokio::test]
async fn top_returns_five_best_cats() {
    let (app, _) = app(MemorySource::with_cats(10)).await;

    call(&app, "POST", "/api/match", Some(json!({ "winner_id": "cat-7", "loser_id": "cat-2" }))).await;
    let (status, body) = call(&app, "GET", "/api/top", None).await;

    assert_eq!(status, StatusCode::OK);
    let cats = body.as_array().unwrap();
    assert_eq!(cats.len(), 5);
    assert_eq!(cats[0]["id"], "cat-7");
    assert_eq!(cats[0]["elo"], 1216);
    assert!(cats.windows(2).all(|w| w[0]["elo"].as_i64() >= w[1]["elo"].as_i64()));
}

#[tokio::test]
async fn random_returns_two_distinct_cats() {
    let (app, _) = app(MemorySource::with_cats(3)).await;

    for _ in 0..20 {
        let (status, body) = call(&app, "GET", "/api/random", None).await;
        assert_eq!(status, StatusCode::OK);
        let pair = body.as_array().unwrap();
        assert_eq!(pair.len(), 2);
        assert_ne!(pair[0]["id"], pair[1]["id"]);
    }
}

#[tokio::test]
async fn random_conflicts_with_a_single_cat() {
    let (app, _) = app(MemorySource::with_cats(1)).await;

    let (status, body) = call(&app, "GET", "/api/random", None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn match_updates_ratings_and_returns_next_opponent() {
    let (app, state) = app(MemorySource::with_cats(4)).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/match",
        Some(json!({ "winner_id": "cat-0", "loser_id": "cat-1", "round": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"]["id"], "cat-0");
    assert_eq!(body["winner"]["elo"], 1216);
    assert_ne!(body["new_opponent"]["id"], "cat-0");
    assert_eq!(ratings(&state), [1216, 1184, 1200, 1200]);
}

#[tokio::test]
async fn bad_matches_are_rejected_without_changes() {
    let (app, state) = app(MemorySource::with_cats(3)).await;

    let unknown = json!({ "winner_id": "cat-0", "loser_id": "ghost" });
    let self_match = json!({ "winner_id": "cat-1", "loser_id": "cat-1" });
    let missing_field = json!({ "winner_id": "cat-1" });

    for body in [unknown, self_match, missing_field] {
        let (status, response) = call(&app, "POST", "/api/match", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].is_string());
    }

    let (status, _) = call(&app, "POST", "/api/match", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(ratings(&state), [1200, 1200, 1200]);
}

#[tokio::test]
async fn reload_merges_and_keeps_ratings() {
    let source = MemorySource::with_cats(3);
    let (app, state) = app(Arc::clone(&source) as Arc<dyn ContentSource>).await;
    call(&app, "POST", "/api/match", Some(json!({ "winner_id": "cat-2", "loser_id": "cat-0" }))).await;

    source.set(Some(entries(1..5)));
    let (status, body) = call(&app, "POST", "/api/reload", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Loaded 4 cats (2 kept, 2 added, 1 dropped)");
    assert_eq!(ratings(&state), [1200, 1216, 1200, 1200]);
}

#[tokio::test]
async fn failed_reload_leaves_registry_untouched() {
    let source = MemorySource::with_cats(2);
    let (app, state) = app(Arc::clone(&source) as Arc<dyn ContentSource>).await;
    call(&app, "POST", "/api/match", Some(json!({ "winner_id": "cat-1", "loser_id": "cat-0" }))).await;

    source.set(None);
    let (status, body) = call(&app, "POST", "/api/reload", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("503"));
    assert_eq!(ratings(&state), [1184, 1216]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn pending_reload_does_not_block_the_game() {
    let source = Arc::new(GatedSource::default());
    let (app, state) = app(Arc::clone(&source) as Arc<dyn ContentSource>).await;
    source.armed.store(true, Ordering::SeqCst);

    let reload = tokio::spawn({
        let app = app.clone();
        async move { call(&app, "POST", "/api/reload", None).await }
    });
    source.entered.notified().await;

    let top = tokio::spawn({
        let app = app.clone();
        async move { call(&app, "GET", "/api/top", None).await }
    });
    let (status, _) = timeout(Duration::from_secs(2), top)
        .await
        .expect("leaderboard waited on the pending reload")
        .unwrap();
    assert_eq!(status, StatusCode::OK);

    let vote = tokio::spawn({
        let app = app.clone();
        let body = json!({ "winner_id": "cat-0", "loser_id": "cat-1" });
        async move { call(&app, "POST", "/api/match", Some(body)).await }
    });
    let (status, _) = timeout(Duration::from_secs(2), vote)
        .await
        .expect("vote waited on the pending reload")
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(!reload.is_finished());

    source.release.notify_one();
    let (status, body) = reload.await.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Loaded 3 cats (3 kept, 0 added, 0 dropped)");
    assert_eq!(ratings(&state), [1216, 1184, 1200]);
}

#[tokio::test]
async fn failed_initial_sync_is_an_error() {
    let source = MemorySource::with_cats(0);
    source.set(None);

    let err = init(&ApiConfig::default(), source).await.unwrap_err();
    assert!(err.to_string().contains("Initial cat sync"));
}

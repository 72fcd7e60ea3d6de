// Router tests: requests go through `build_router` with `oneshot`, no socket.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use topicscope::config::{Config, SourceBackend};
use topicscope::store::traits::{DocumentPage, DocumentSource, PageKey};
use topicscope::web::{build_router, AppState};

struct StaticSource(Vec<String>);

#[async_trait]
impl DocumentSource for StaticSource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    async fn fetch_page(&self, _start: Option<&PageKey>) -> Result<DocumentPage> {
        Ok(DocumentPage {
            documents: self.0.clone(),
            last_evaluated_key: None,
        })
    }
}

struct BrokenSource;

#[async_trait]
impl DocumentSource for BrokenSource {
    fn describe(&self) -> String {
        "broken".to_string()
    }

    async fn fetch_page(&self, _start: Option<&PageKey>) -> Result<DocumentPage> {
        anyhow::bail!("table unreachable")
    }
}

/// Takes `delay` per page and records how many scans overlap.
struct SlowSource {
    documents: Vec<String>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowSource {
    fn new(documents: Vec<String>, delay: Duration) -> Self {
        Self {
            documents,
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DocumentSource for SlowSource {
    fn describe(&self) -> String {
        "slow".to_string()
    }

    async fn fetch_page(&self, _start: Option<&PageKey>) -> Result<DocumentPage> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(DocumentPage {
            documents: self.documents.clone(),
            last_evaluated_key: None,
        })
    }
}

fn config(static_dir: &Path) -> Config {
    Config {
        source_backend: SourceBackend::File,
        table_name: "unused".to_string(),
        text_attribute: "question".to_string(),
        documents_file: None,
        static_dir: static_dir.to_path_buf(),
        num_topics: 3,
        iterations: 30,
        seed: 7,
        stopword_language: "spanish".to_string(),
        extra_stopwords: Vec::new(),
        map_max_documents: 1000,
    }
}

fn survey() -> Vec<String> {
    [
        "¿Cómo ordenar una lista en Python?",
        "Funciones lambda en Python",
        "Receta de arroz con pollo",
        "Arroz al horno con verduras",
        "Derivadas e integrales de cálculo",
        "Ejercicios de integrales definidas",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn state(dir: &Path, source: impl DocumentSource + 'static) -> AppState {
    AppState::new(config(dir), Arc::new(source))
}

fn shared_state(dir: &Path, source: Arc<SlowSource>) -> AppState {
    AppState::new(config(dir), source)
}

async fn get(state: &AppState, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = build_router(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(state: &AppState, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(state, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), StaticSource(Vec::new()));
    let (status, body) = get_json(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn topic_modeling_returns_report() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), StaticSource(survey()));
    let (status, body) = get_json(&state, "/api/topic_modeling").await;
    assert_eq!(status, StatusCode::OK);

    let topics = body["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 3);
    for (i, topic) in topics.iter().enumerate() {
        assert_eq!(topic["id"], i);
        assert_eq!(topic["keywords"].as_array().unwrap().len(), 5);
    }

    let documents = body["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 6);
    assert_eq!(documents[0]["text"], "¿Cómo ordenar una lista en Python?");
    assert!(documents.iter().all(|d| d["topic"].as_u64().unwrap() < 3));
}

#[tokio::test]
async fn visualizations_are_served_after_a_run() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), StaticSource(survey()));

    let (before, _) = get(&state, "/static/lda_visualization.html").await;
    assert_eq!(before, StatusCode::NOT_FOUND);

    let (status, _) = get(&state, "/api/topic_modeling").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&state, "/static/lda_visualization.html").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().starts_with("<!DOCTYPE html>"));

    let (status, _) = get(&state, "/static/nube_tema_2.svg").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn empty_source_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), StaticSource(Vec::new()));
    let (status, body) = get_json(&state, "/api/topic_modeling").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "No documents to analyze");
}

#[tokio::test]
async fn source_failure_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), BrokenSource);
    let (status, body) = get_json(&state, "/api/topic_modeling").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("table unreachable"));
}

#[tokio::test]
async fn status_tracks_last_run() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), StaticSource(survey()));

    let (_, idle) = get_json(&state, "/api/status").await;
    assert_eq!(idle["running"], false);
    assert!(idle["finished_at"].is_null());

    get(&state, "/api/topic_modeling").await;
    let (status, done) = get_json(&state, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["running"], false);
    assert_eq!(done["document_count"], 6);
    assert!(done["last_error"].is_null());
    assert!(done["started_at"].is_string());
    assert!(done["finished_at"].is_string());
}

#[tokio::test]
async fn status_records_failure() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), BrokenSource);
    get(&state, "/api/topic_modeling").await;
    let (_, body) = get_json(&state, "/api/status").await;
    assert!(body["last_error"].as_str().unwrap().contains("table unreachable"));
}

// ============================================================
// Run lifecycle
// ============================================================

#[tokio::test]
async fn abandoned_request_still_completes_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(SlowSource::new(survey(), Duration::from_millis(300)));
    let state = shared_state(dir.path(), source);

    let abandoned =
        tokio::time::timeout(Duration::from_millis(50), get(&state, "/api/topic_modeling")).await;
    assert!(abandoned.is_err(), "request should still be running at 50ms");
    assert!(state.run_lock.try_lock().is_err(), "run keeps the lock after the client leaves");

    let mut finished = None;
    for _ in 0..200 {
        let (_, body) = get_json(&state, "/api/status").await;
        if body["running"] == false && body["finished_at"].is_string() {
            finished = Some(body);
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    let finished = finished.expect("run never finished");
    assert_eq!(finished["document_count"], 6);
    assert!(finished["last_error"].is_null());
    assert!(state.run_lock.try_lock().is_ok());
    assert!(dir.path().join("lda_visualization.html").is_file());
}

#[tokio::test]
async fn concurrent_runs_are_serialized() {
    let dir = tempfile::tempdir().unwrap();
    let source = Arc::new(SlowSource::new(survey(), Duration::from_millis(50)));
    let state = shared_state(dir.path(), source.clone());

    let (a, b) = tokio::join!(
        get(&state, "/api/topic_modeling"),
        get(&state, "/api/topic_modeling")
    );
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);
    assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
}

// ============================================================
// CORS and chart aliases
// ============================================================

#[tokio::test]
async fn cors_allows_any_origin() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), StaticSource(Vec::new()));
    let response = build_router(state)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn dashboard_png_names_serve_the_svg_charts() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path(), StaticSource(survey()));
    let (status, _) = get(&state, "/api/topic_modeling").await;
    assert_eq!(status, StatusCode::OK);

    for uri in [
        "/static/distribucion_temas.png",
        "/static/tsne_visualization.png",
        "/static/nube_tema_0.png",
        "/static/nube_tema_2.png",
    ] {
        let response = build_router(state.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "image/svg+xml",
            "{uri}"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).starts_with("<svg"), "{uri}");
    }

    let (status, _) = get(&state, "/static/nube_tema_3.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&state, "/static/logo.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// Web server. Axum backend for the topic modeling dashboard.
//
// GET /api/topic_modeling runs the whole pipeline on every request and
// returns the JSON summary; the visualizations it writes are served from
// the static directory under /static. The dashboard asks for charts by
// their `.png` names; those requests are answered with the SVG written.

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::sync::{Mutex, RwLock};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::render::chart_alias;
use crate::store::traits::DocumentSource;

pub mod handlers;
pub mod run_status;

use run_status::RunStatus;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn DocumentSource>,
    /// Held for the duration of a run: every run rewrites the same files.
    pub run_lock: Arc<Mutex<()>>,
    pub run_status: Arc<RwLock<RunStatus>>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn DocumentSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            run_lock: Arc::new(Mutex::new(())),
            run_status: Arc::new(RwLock::new(RunStatus::default())),
        }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(
    config: Config,
    source: Arc<dyn DocumentSource>,
    port: u16,
    bind: &str,
) -> Result<()> {
    let state = AppState::new(config, source);
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Topic modeling API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let static_files = ServiceBuilder::new()
        .map_request(alias_chart_request)
        .service(ServeDir::new(&state.config.static_dir));

    Router::new()
        .route(
            "/api/topic_modeling",
            get(handlers::topic_modeling::get_topic_modeling),
        )
        .route("/api/status", get(handlers::status::get_status))
        .route("/health", get(health))
        .nest_service("/static", static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Point `.png` chart requests at the SVG file on disk.
fn alias_chart_request(mut request: Request<Body>) -> Request<Body> {
    let Some(svg) = request.uri().path().strip_prefix('/').and_then(chart_alias) else {
        return request;
    };
    if let Ok(uri) = format!("/{svg}").parse::<Uri>() {
        *request.uri_mut() = uri;
    }
    request
}

/// Liveness check, always 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}

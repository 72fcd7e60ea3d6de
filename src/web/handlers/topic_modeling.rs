// GET /api/topic_modeling: run the full pipeline and return the summary.
//
// Returns 200 with `{"topics": [...], "documents": [...]}` on success,
// 422 when there is nothing to model, 500 for anything else. Concurrent
// requests queue behind the run lock rather than racing on the output files.
//
// The run is a spawned task that owns the lock and both status updates, so a
// client that disconnects mid-run does not cancel it: the task still finishes,
// records the outcome and releases the lock.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use tracing::{error, warn};

use crate::model::EmptyCorpus;
use crate::pipeline;
use crate::web::{api_error, AppState};

pub async fn get_topic_modeling(State(state): State<AppState>) -> Response {
    match tokio::spawn(run_to_completion(state)).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Topic modeling task panicked");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Topic modeling task failed")
        }
    }
}

async fn run_to_completion(state: AppState) -> Response {
    let _run = state.run_lock.clone().lock_owned().await;

    {
        let mut status = state.run_status.write().await;
        status.running = true;
        status.started_at = Some(Utc::now().to_rfc3339());
    }

    let settings = state.config.analysis_settings();
    let result = pipeline::run(state.source.as_ref(), &settings, &state.config.static_dir).await;

    let mut status = state.run_status.write().await;
    status.running = false;
    status.finished_at = Some(Utc::now().to_rfc3339());

    match result {
        Ok(outcome) => {
            status.last_error = None;
            status.document_count = Some(outcome.document_count);
            Json(outcome.report).into_response()
        }
        Err(e) => {
            status.last_error = Some(e.to_string());
            if let Some(empty) = e.downcast_ref::<EmptyCorpus>() {
                warn!(documents = empty.documents, "Nothing to model");
                api_error(StatusCode::UNPROCESSABLE_ENTITY, &empty.to_string())
            } else {
                error!(error = %format!("{e:#}"), "Topic modeling run failed");
                api_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!("Topic modeling failed: {e:#}"),
                )
            }
        }
    }
}

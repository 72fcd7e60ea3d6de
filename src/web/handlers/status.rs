// GET /api/status reports whether a run is in progress and how the last one went.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.run_status.read().await.clone();
    Json(status)
}

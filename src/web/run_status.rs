// Live status of topic modeling runs, exposed via GET /api/status.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStatus {
    /// True while a run is in progress.
    pub running: bool,
    /// RFC 3339 timestamp of when the current/last run started.
    pub started_at: Option<String>,
    /// RFC 3339 timestamp of when the last run finished (success or failure).
    pub finished_at: Option<String>,
    /// Documents analyzed by the last successful run.
    pub document_count: Option<usize>,
    /// Error message from the last run, if it failed.
    pub last_error: Option<String>,
}

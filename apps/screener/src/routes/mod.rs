pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file bytes.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = upload_body_limit(&state);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route("/api/v1/session/mode", put(handlers::handle_set_mode))
        .route(
            "/api/v1/session/job-description",
            put(handlers::handle_set_job_description),
        )
        .route("/api/v1/session/files", post(handlers::handle_upload_files))
        .route(
            "/api/v1/session/files/:name",
            delete(handlers::handle_remove_file),
        )
        .route(
            "/api/v1/session/analysis",
            post(handlers::handle_start_analysis),
        )
        .route("/api/v1/session/results", get(handlers::handle_get_results))
        .route("/api/v1/session/report", get(handlers::handle_download_report))
        .route("/api/v1/session/reset", post(handlers::handle_reset))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Large enough for a full bulk selection at the per-file ceiling. Oversized files
/// must reach the validator so they are reported by name instead of as a 413.
fn upload_body_limit(state: &AppState) -> usize {
    let per_file = usize::try_from(state.config.max_file_size_mb)
        .unwrap_or(usize::MAX)
        .saturating_mul(1024 * 1024);
    // One extra file's worth lets a single oversized file through to the validator.
    per_file
        .saturating_mul(state.config.max_bulk_files.saturating_add(1))
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

//! Axum route handlers for the screening session API.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::screening::models::{AnalysisMode, Job, UploadedFile};
use crate::screening::ranker::shortlist;
use crate::screening::session::SessionView;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SetModeRequest {
    pub mode: AnalysisMode,
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Present when the selection was truncated to the cap.
    pub warning: Option<String>,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub batch_id: String,
    pub session: SessionView,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.orchestrator.view().await)
}

/// PUT /api/v1/session/mode
///
/// Switching to a different mode resets the whole session.
pub async fn handle_set_mode(
    State(state): State<AppState>,
    Json(request): Json<SetModeRequest>,
) -> Json<SessionView> {
    state.orchestrator.set_mode(request.mode).await;
    Json(state.orchestrator.view().await)
}

/// PUT /api/v1/session/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<Json<SessionView>, AppError> {
    state
        .orchestrator
        .set_job_description(request.job_description)
        .await?;
    Ok(Json(state.orchestrator.view().await))
}

/// POST /api/v1/session/files
///
/// Multipart upload. Every part with a non-empty file name is a candidate file;
/// other parts, including an empty file input (`filename=""`), are ignored.
pub async fn handle_upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut incoming = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(file_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            continue;
        };
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read {file_name}: {e}")))?;

        incoming.push(UploadedFile::new(file_name, content_type, bytes));
    }

    if incoming.is_empty() {
        return Err(AppError::Validation(
            "Request contained no files".to_string(),
        ));
    }

    let warning = state.orchestrator.select_files(incoming).await?;

    Ok(Json(UploadResponse {
        warning: warning.map(|w| w.to_string()),
        session: state.orchestrator.view().await,
    }))
}

/// DELETE /api/v1/session/files/:name
pub async fn handle_remove_file(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    state.orchestrator.remove_file(&file_name).await?;
    Ok(Json(state.orchestrator.view().await))
}

/// POST /api/v1/session/analysis
///
/// Starts the batch and returns immediately; poll the session or results for progress.
pub async fn handle_start_analysis(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<StartResponse>), AppError> {
    let batch = state.orchestrator.start().await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(StartResponse {
            batch_id: batch.to_string(),
            session: state.orchestrator.view().await,
        }),
    ))
}

/// GET /api/v1/session/results
pub async fn handle_get_results(State(state): State<AppState>) -> Json<Vec<Job>> {
    Json(state.orchestrator.ranked().await)
}

/// GET /api/v1/session/report
///
/// Downloads the shortlist of successful jobs in ranked order.
pub async fn handle_download_report(State(state): State<AppState>) -> Result<Response, AppError> {
    let rows = shortlist(&state.orchestrator.ranked().await);
    let report = state
        .exporter
        .export(&rows, chrono::Local::now().date_naive())?;

    Ok((
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name),
            ),
        ],
        report.bytes,
    )
        .into_response())
}

/// POST /api/v1/session/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<SessionView> {
    state.orchestrator.reset().await;
    Json(state.orchestrator.view().await)
}

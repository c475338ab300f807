use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    BatchItemOutcome, Candidate, ExtractionFailure, ExtractionJob, JobId, JobKind, JobResult,
};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    pub job_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,
    pub priority: String,
    pub progress: u8,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ExtractionFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResultView>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum JobResultView {
    Contacts {
        from_cache: bool,
        count: usize,
        candidates: Vec<Candidate>,
    },
    Batch {
        items: Vec<BatchItemOutcome>,
    },
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(uuid) => uuid,
        Err(_) => {
            tracing::debug!(job_id = %job_id, "Rejecting malformed job id");
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid job id: {}", job_id),
            );
        }
    };

    match state.job_store.get(JobId::from_uuid(uuid)).await {
        Ok(Some(job)) => (StatusCode::OK, Json(render_job(&job))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("Job {} not found", job_id)),
        Err(e) => {
            tracing::error!(error = %e, job_id = %job_id, "Failed to load job");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load job".to_string(),
            )
        }
    }
}

fn render_job(job: &ExtractionJob) -> JobStatusResponse {
    let (job_type, filename, file_count) = match &job.kind {
        JobKind::Single { filename } => ("single", Some(filename.clone()), None),
        JobKind::Batch { file_count } => ("batch", None, Some(*file_count)),
    };

    let result = job.result.as_ref().map(|result| match result {
        JobResult::Contacts {
            candidates,
            from_cache,
        } => JobResultView::Contacts {
            from_cache: *from_cache,
            count: candidates.len(),
            candidates: candidates.clone(),
        },
        JobResult::Batch(items) => JobResultView::Batch {
            items: items.clone(),
        },
    });

    JobStatusResponse {
        job_id: job.id.as_uuid().to_string(),
        status: job.status.as_str().to_string(),
        job_type: job_type.to_string(),
        filename,
        file_count,
        priority: job.priority.as_str().to_string(),
        progress: job.progress,
        created_at: job.created_at.to_rfc3339(),
        started_at: job.started_at.map(|t| t.to_rfc3339()),
        finished_at: job.finished_at.map(|t| t.to_rfc3339()),
        error: job.error.clone(),
        result,
    }
}

fn error_response(status: StatusCode, message: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

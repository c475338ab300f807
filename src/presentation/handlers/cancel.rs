use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::CancelOutcome;
use crate::domain::JobId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct CancelResponse {
    pub job_id: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state))]
pub async fn cancel_job_handler(
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

    match state.orchestrator.cancel(JobId::from_uuid(uuid)).await {
        Ok(CancelOutcome::Cancelled) => {
            tracing::info!(job_id = %job_id, "Job cancelled");
            (
                StatusCode::OK,
                Json(CancelResponse {
                    job_id,
                    message: "Job cancelled".to_string(),
                }),
            )
                .into_response()
        }
        Ok(CancelOutcome::NotFound) => {
            error_response(StatusCode::NOT_FOUND, format!("Job {} not found", job_id))
        }
        Ok(CancelOutcome::AlreadyFinished(status)) => error_response(
            StatusCode::CONFLICT,
            format!("Job already {}", status.as_str()),
        ),
        Err(e) => {
            tracing::error!(error = %e, job_id = %job_id, "Failed to cancel job");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to cancel job".to_string(),
            )
        }
    }
}

fn error_response(status: StatusCode, message: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

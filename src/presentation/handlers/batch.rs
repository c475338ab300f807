use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::services::{BatchFile, BatchPayload, SubmitError};
use crate::domain::{BatchItemOutcome, ErrorKind, ExtractionFailure, MimeKind};
use crate::presentation::handlers::extract::parse_options;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct BatchAcceptedResponse {
    pub job_id: String,
    pub status: String,
    pub files_accepted: usize,
    pub files_rejected: usize,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn batch_extract_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut files: Vec<BatchFile> = Vec::new();
    let mut rejected: Vec<BatchItemOutcome> = Vec::new();
    let mut force_raw: Option<String> = None;
    let mut priority_raw: Option<String> = None;
    let mut total_files = 0usize;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                );
            }
        };

        if field.file_name().is_some() {
            total_files += 1;
            if total_files > state.settings.limits.max_batch_files {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!(
                        "Batch exceeds the {} file limit",
                        state.settings.limits.max_batch_files
                    ),
                );
            }

            let filename = field.file_name().unwrap_or("unknown").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = match field.bytes().await {
                Ok(data) => data,
                Err(e) => {
                    tracing::error!(error = %e, filename = %filename, "Failed to read file bytes");
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read file {}: {}", filename, e),
                    );
                }
            };

            match validate_file(&content_type, data.len() as u64, &state) {
                Ok(mime) => files.push(BatchFile {
                    filename,
                    data: data.to_vec(),
                    mime,
                }),
                Err(failure) => {
                    tracing::debug!(
                        filename = %filename,
                        kind = %failure.kind,
                        "Rejecting batch item at upload"
                    );
                    rejected.push(BatchItemOutcome::failed(filename, failure));
                }
            }
        } else {
            match field.name() {
                Some("force_strategy") => match field.text().await {
                    Ok(text) => force_raw = Some(text),
                    Err(e) => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read force_strategy: {}", e),
                        );
                    }
                },
                Some("priority") => match field.text().await {
                    Ok(text) => priority_raw = Some(text),
                    Err(e) => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read priority: {}", e),
                        );
                    }
                },
                _ => {}
            }
        }
    }

    if total_files == 0 {
        tracing::warn!("Batch request with no files");
        return error_response(StatusCode::BAD_REQUEST, "No files uploaded".to_string());
    }

    let options = match parse_options(force_raw.as_deref(), priority_raw.as_deref()) {
        Ok(options) => options,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let files_accepted = files.len();
    let files_rejected = rejected.len();
    let payload = BatchPayload {
        files,
        rejected,
        options,
    };

    match state.orchestrator.submit_batch(payload).await {
        Ok(job_id) => {
            tracing::info!(
                job_id = %job_id.as_uuid(),
                files_accepted,
                files_rejected,
                "Batch extraction job enqueued"
            );
            (
                StatusCode::ACCEPTED,
                Json(BatchAcceptedResponse {
                    job_id: job_id.as_uuid().to_string(),
                    status: "QUEUED".to_string(),
                    files_accepted,
                    files_rejected,
                    message: "Batch extraction started".to_string(),
                }),
            )
                .into_response()
        }
        Err(e @ (SubmitError::QueueFull | SubmitError::WorkersUnavailable)) => {
            tracing::warn!(error = %e, "Rejecting batch, no capacity");
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to submit batch job");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to submit job: {}", e),
            )
        }
    }
}

fn validate_file(
    content_type: &str,
    size_bytes: u64,
    state: &AppState,
) -> Result<MimeKind, ExtractionFailure> {
    let Some(mime) = MimeKind::from_mime(content_type) else {
        return Err(ExtractionFailure::new(
            ErrorKind::UnsupportedFormat,
            format!("Unsupported content type: {}", content_type),
        ));
    };

    if size_bytes == 0 {
        return Err(ExtractionFailure::new(
            ErrorKind::EmptyDocument,
            "Uploaded file is empty",
        ));
    }

    if size_bytes > state.settings.limits.max_upload_bytes {
        return Err(ExtractionFailure::new(
            ErrorKind::FileTooLarge,
            format!(
                "File exceeds the {} byte limit",
                state.settings.limits.max_upload_bytes
            ),
        ));
    }

    Ok(mime)
}

fn error_response(status: StatusCode, message: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

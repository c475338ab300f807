use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::services::{SinglePayload, SubmitError};
use crate::domain::{
    Candidate, ErrorKind, ExtractionOptions, JobPriority, JobResult, JobStatus, MimeKind,
    StrategyKind,
};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ExtractResponse {
    pub job_id: String,
    pub status: String,
    pub from_cache: bool,
    pub count: usize,
    pub candidates: Vec<Candidate>,
}

#[derive(Serialize)]
pub struct ExtractPendingResponse {
    pub job_id: String,
    pub status: String,
    pub progress: u8,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// How the caller wants the answer: inline once extraction settles, or
/// a job handle straight away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitMode {
    Sync,
    Async,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn extract_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut file: Option<(String, String, Bytes)> = None;
    let mut force_raw: Option<String> = None;
    let mut priority_raw: Option<String> = None;
    let mut mode_raw: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return plain_error(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                );
            }
        };

        if field.file_name().is_some() {
            if file.is_some() {
                return plain_error(
                    StatusCode::BAD_REQUEST,
                    "Expected exactly one file".to_string(),
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
                    tracing::error!(error = %e, "Failed to read file bytes");
                    return plain_error(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read file: {}", e),
                    );
                }
            };
            file = Some((filename, content_type, data));
        } else {
            match field.name() {
                Some("force_strategy") => match field.text().await {
                    Ok(text) => force_raw = Some(text),
                    Err(e) => {
                        return plain_error(
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read force_strategy: {}", e),
                        );
                    }
                },
                Some("priority") => match field.text().await {
                    Ok(text) => priority_raw = Some(text),
                    Err(e) => {
                        return plain_error(
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read priority: {}", e),
                        );
                    }
                },
                Some("mode") => match field.text().await {
                    Ok(text) => mode_raw = Some(text),
                    Err(e) => {
                        return plain_error(
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read mode: {}", e),
                        );
                    }
                },
                _ => {}
            }
        }
    }

    let Some((filename, content_type, data)) = file else {
        tracing::warn!("Extract request with no file");
        return plain_error(StatusCode::BAD_REQUEST, "No file uploaded".to_string());
    };

    tracing::debug!(
        filename = %filename,
        content_type = %content_type,
        bytes = data.len(),
        "Processing file upload"
    );

    let mime = match MimeKind::from_mime(&content_type) {
        Some(mime) => mime,
        None => {
            tracing::warn!(content_type = %content_type, "Unsupported content type");
            return kind_error(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorKind::UnsupportedFormat,
                format!("Unsupported content type: {}", content_type),
            );
        }
    };

    if data.is_empty() {
        return kind_error(
            StatusCode::BAD_REQUEST,
            ErrorKind::EmptyDocument,
            "Uploaded file is empty".to_string(),
        );
    }

    if data.len() as u64 > state.settings.limits.max_upload_bytes {
        return kind_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::FileTooLarge,
            format!(
                "File exceeds the {} byte limit",
                state.settings.limits.max_upload_bytes
            ),
        );
    }

    let options = match parse_options(force_raw.as_deref(), priority_raw.as_deref()) {
        Ok(options) => options,
        Err(message) => return plain_error(StatusCode::BAD_REQUEST, message),
    };

    let mode = match parse_mode(mode_raw.as_deref()) {
        Ok(mode) => mode,
        Err(message) => return plain_error(StatusCode::BAD_REQUEST, message),
    };

    let payload = SinglePayload {
        filename: filename.clone(),
        data: data.to_vec(),
        mime,
        options,
    };

    let job_id = match state.orchestrator.submit_single(payload).await {
        Ok(job_id) => job_id,
        Err(e @ (SubmitError::QueueFull | SubmitError::WorkersUnavailable)) => {
            tracing::warn!(error = %e, "Rejecting upload, no capacity");
            return plain_error(StatusCode::SERVICE_UNAVAILABLE, e.to_string());
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to submit extraction job");
            return plain_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to submit job: {}", e),
            );
        }
    };

    if mode == SubmitMode::Async {
        tracing::info!(job_id = %job_id.as_uuid(), "Extraction accepted for background processing");
        return (
            StatusCode::ACCEPTED,
            Json(ExtractPendingResponse {
                job_id: job_id.as_uuid().to_string(),
                status: JobStatus::Queued.to_string(),
                progress: 0,
                message: "Extraction queued, poll the job endpoint".to_string(),
            }),
        )
            .into_response();
    }

    let job = match state.orchestrator.wait_for_terminal(job_id).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            tracing::error!(job_id = %job_id.as_uuid(), "Submitted job vanished");
            return plain_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Job disappeared before completion".to_string(),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read job state");
            return plain_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read job: {}", e),
            );
        }
    };

    match job.status {
        JobStatus::Completed => match job.result {
            Some(JobResult::Contacts {
                candidates,
                from_cache,
            }) => {
                tracing::info!(
                    job_id = %job_id.as_uuid(),
                    candidates = candidates.len(),
                    from_cache,
                    "Extraction served"
                );
                (
                    StatusCode::OK,
                    Json(ExtractResponse {
                        job_id: job_id.as_uuid().to_string(),
                        status: job.status.to_string(),
                        from_cache,
                        count: candidates.len(),
                        candidates,
                    }),
                )
                    .into_response()
            }
            _ => {
                tracing::error!(job_id = %job_id.as_uuid(), "Completed job has no contact result");
                plain_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Job completed without a result".to_string(),
                )
            }
        },
        JobStatus::Failed => match job.error {
            Some(failure) => kind_error(failure_status(failure.kind), failure.kind, failure.reason),
            None => plain_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Job failed without an error".to_string(),
            ),
        },
        JobStatus::Queued | JobStatus::Running => (
            StatusCode::ACCEPTED,
            Json(ExtractPendingResponse {
                job_id: job_id.as_uuid().to_string(),
                status: job.status.to_string(),
                progress: job.progress,
                message: "Extraction still running, poll the job endpoint".to_string(),
            }),
        )
            .into_response(),
    }
}

pub(crate) fn parse_options(
    force_raw: Option<&str>,
    priority_raw: Option<&str>,
) -> Result<ExtractionOptions, String> {
    let force_strategy = match force_raw.map(str::trim) {
        None | Some("") | Some("auto") => None,
        Some(value) => Some(
            value
                .parse::<StrategyKind>()
                .map_err(|_| format!("Invalid force_strategy: {}", value))?,
        ),
    };

    let priority = match priority_raw.map(str::trim) {
        None | Some("") | Some("normal") => JobPriority::Normal,
        Some("high") => JobPriority::High,
        Some(other) => return Err(format!("Invalid priority: {}", other)),
    };

    Ok(ExtractionOptions::new(force_strategy, priority))
}

fn parse_mode(mode_raw: Option<&str>) -> Result<SubmitMode, String> {
    match mode_raw.map(str::trim) {
        None | Some("") | Some("sync") => Ok(SubmitMode::Sync),
        Some("async") => Ok(SubmitMode::Async),
        Some(other) => Err(format!("Invalid mode: {}", other)),
    }
}

pub(crate) fn failure_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::UnsupportedFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorKind::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorKind::EmptyDocument | ErrorKind::CorruptFile | ErrorKind::NoCandidatesFound => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorKind::StrategyTimeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::StrategyUnavailable => StatusCode::BAD_GATEWAY,
        ErrorKind::CacheUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::JobCancelled => StatusCode::CONFLICT,
        ErrorKind::RoutingDecisionFailed | ErrorKind::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn plain_error(status: StatusCode, message: String) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message,
            kind: None,
        }),
    )
        .into_response()
}

fn kind_error(status: StatusCode, kind: ErrorKind, message: String) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message,
            kind: Some(kind.to_string()),
        }),
    )
        .into_response()
}

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    batch_extract_handler, cancel_job_handler, clear_cache_handler, extract_handler,
    health_handler, job_status_handler,
};
use crate::presentation::state::AppState;

/// Headroom on top of the raw file bytes for multipart boundaries,
/// part headers and the option fields.
const MULTIPART_SLACK_BYTES: u64 = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // A batch request may carry max_batch_files files of max_upload_bytes
    // each. Per-file limits are still enforced in the handlers.
    let body_limit = state.settings.limits.max_upload_bytes
        * state.settings.limits.max_batch_files as u64
        + MULTIPART_SLACK_BYTES;

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/extract", post(extract_handler))
        .route("/api/v1/extract/batch", post(batch_extract_handler))
        .route(
            "/api/v1/jobs/{job_id}",
            get(job_status_handler).delete(cancel_job_handler),
        )
        .route("/api/v1/admin/cache/clear", post(clear_cache_handler))
        .layer(DefaultBodyLimit::max(body_limit as usize))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

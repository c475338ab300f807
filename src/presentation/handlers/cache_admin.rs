use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct CacheClearResponse {
    pub cleared: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state))]
pub async fn clear_cache_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.result_cache.clear_all().await {
        Ok(cleared) => {
            tracing::info!(cleared, "Result cache cleared");
            (StatusCode::OK, Json(CacheClearResponse { cleared })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to clear result cache");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to clear cache".to_string(),
                }),
            )
                .into_response()
        }
    }
}

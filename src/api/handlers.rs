use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::contracts::{CounterSnapshot, CounterStore, UpstreamError};

/// Application state shared across handlers.
pub struct AppState<C: CounterStore> {
    pub counter: Arc<C>,
}

impl<C: CounterStore> AppState<C> {
    pub fn new(counter: Arc<C>) -> Self {
        Self { counter }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// API error type.
pub enum ApiError {
    Upstream(UpstreamError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let ApiError::Upstream(e) = self;
        let code = match e {
            UpstreamError::Transport(_) => "TRANSPORT_ERROR",
            UpstreamError::Parse(_) => "PARSE_ERROR",
            UpstreamError::Auth(_) => "AUTH_ERROR",
            UpstreamError::Upstream { .. } => "UPSTREAM_ERROR",
            UpstreamError::RecordNotFound => "RECORD_NOT_FOUND",
        };
        tracing::error!(error = %e, code = code, "Request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
                code: code.into(),
            }),
        )
            .into_response()
    }
}

impl From<UpstreamError> for ApiError {
    fn from(e: UpstreamError) -> Self {
        ApiError::Upstream(e)
    }
}

/// GET /health
/// Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /likes
/// Current like count. A missing or malformed counter record reads as the
/// default value.
pub async fn get_likes<C: CounterStore>(
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<CounterSnapshot>, ApiError> {
    let snapshot = state.counter.fetch_count().await?;
    Ok(Json(snapshot))
}

/// POST /like
/// Increments the like count by one and returns the new value.
///
/// Not deduplicated: every call increments. Concurrent calls may lose
/// updates since the upstream write is a plain read-modify-write.
pub async fn post_like<C: CounterStore>(
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<CounterSnapshot>, ApiError> {
    let count = state.counter.increment().await?;
    Ok(Json(CounterSnapshot::new(count, true)))
}

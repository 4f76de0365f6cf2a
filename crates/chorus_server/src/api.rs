//! HTTP API for text generation and health checks.

use crate::GenerationService;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chorus_core::{GenerationRequest, GenerationResult};
use chorus_error::{GenerationError, GenerationErrorKind};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, instrument, warn};

/// API server state.
#[derive(Clone)]
pub struct ApiState {
    /// Generation entry point
    pub service: Arc<GenerationService>,
}

impl ApiState {
    /// Creates a new API state.
    pub fn new(service: Arc<GenerationService>) -> Self {
        Self { service }
    }
}

/// Creates the API router.
pub fn create_router(service: Arc<GenerationService>) -> Router {
    let state = ApiState { service };

    Router::new()
        .route("/generate-text/", post(generate_text))
        .route("/generate-text", post(generate_text))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Error response carrying a `detail` message.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status to return
    pub status: StatusCode,
    /// Human-readable explanation
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        let status = match err.kind() {
            GenerationErrorKind::Validation(_) => StatusCode::BAD_REQUEST,
            GenerationErrorKind::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GenerationErrorKind::Overloaded(_) => StatusCode::SERVICE_UNAVAILABLE,
            GenerationErrorKind::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        };
        if status.is_server_error() {
            error!(error = %err, "Generation request failed");
        } else {
            warn!(error = %err, "Generation request rejected");
        }
        Self {
            status,
            detail: err.detail(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::BAD_REQUEST => StatusCode::UNPROCESSABLE_ENTITY,
            other => other,
        };
        Self {
            status,
            detail: rejection.body_text(),
        }
    }
}

/// Generate text from every registered model.
#[instrument(skip_all)]
async fn generate_text(
    State(state): State<ApiState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, ApiError> {
    let Json(request) = payload?;
    let result = state.service.generate(request).await?;
    Ok(Json(result))
}

/// Health check endpoint.
#[instrument(skip_all)]
async fn health_check(State(state): State<ApiState>) -> impl IntoResponse {
    let models = state.service.orchestrator().registry().identifiers();
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "models": models })),
    )
}

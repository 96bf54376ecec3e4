//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/readyz` - Readiness probe (active store health check)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::AppState;

/// Body returned by the readiness probe.
#[derive(Debug, Serialize)]
pub struct ReadinessStatus {
    pub healthy: bool,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /readyz - Readiness probe.
///
/// Probes the store through the repository. Returns 200 if healthy, 503 otherwise.
#[axum::debug_handler]
pub async fn readyz(State(state): State<AppState>) -> Response {
    let table = state.movie_repo.table_name().to_string();

    match state.movie_repo.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessStatus {
                healthy: true,
                table,
                error: None,
            }),
        )
            .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessStatus {
                    healthy: false,
                    table,
                    error: Some(err.to_string()),
                }),
            )
                .into_response()
        }
    }
}

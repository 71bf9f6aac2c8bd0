//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Whether the store answered in time
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Reason the service is not ready
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe; always 200 while the process runs
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness probe
///
/// Issues one count against the store under the store deadline. Returns 503
/// when the store fails or does not answer in time.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let deadline = state.config().store.timeout();
    let probe = tokio::time::timeout(deadline, state.store().count(&[])).await;

    let message = match probe {
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Store not ready");
            Some("Document store unavailable".to_string())
        }
        Err(_) => {
            tracing::warn!(?deadline, "Store readiness probe timed out");
            Some("Document store timed out".to_string())
        }
    };

    let status = if message.is_none() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = ReadinessResponse {
        ready: message.is_none(),
        service: state.config().service.name.clone(),
        message,
    };

    (status, Json(response))
}

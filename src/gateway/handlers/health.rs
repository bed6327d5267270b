//! Health check handler

use std::sync::Arc;

use axum::extract::State;
use chrono::Utc;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ok};

/// Health check response data
#[derive(serde::Serialize)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    pub timestamp_ms: i64,
}

/// Health check endpoint
///
/// - Healthy: 200 OK + {code: 0, data: {timestamp_ms}}
/// - Unhealthy: 503 Service Unavailable, store details stay in the logs
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    if !state.orchestrator.alive().await {
        tracing::error!("[HEALTH] Store ping failed");
        return Err(ApiError::service_unavailable("unavailable"));
    }
    ok(HealthResponse {
        timestamp_ms: Utc::now().timestamp_millis(),
    })
}

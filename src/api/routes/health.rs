//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (backend reachable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 if the backend gateway answers its health check.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.gateway.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(gateway = state.gateway.name(), error = %e, "Gateway not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let gateway_ok = state.gateway.health_check().await.is_ok();

    Json(HealthResponse {
        status: (if gateway_ok { "healthy" } else { "degraded" }).to_string(),
        gateway: state.gateway.name().to_string(),
        gateway_status: (if gateway_ok { "ok" } else { "error" }).to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

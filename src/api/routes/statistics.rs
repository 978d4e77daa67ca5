//! Statistics Routes
//!
//! - POST /api/v1/statistics - Invoke the remote statistics function

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::StatisticsRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::api::identity::CurrentUser;
use crate::api::state::AppState;

/// POST /api/v1/statistics
///
/// Forwards the URLs to the statistics function and returns its JSON
/// response unchanged.
pub async fn fetch_statistics(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Json(req): Json<StatisticsRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.urls.is_empty() {
        return Err(ApiError::Validation("At least one channel URL is required".to_string()));
    }

    let value = state.analytics.statistics(&req.urls).await?;
    Ok(Json(value))
}

//! Payout Routes
//!
//! - GET /api/v1/payout - Balance and payout schedule

use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::identity::CurrentUser;
use crate::api::state::AppState;
use crate::payout::PayoutSummary;

/// GET /api/v1/payout
pub async fn get_payout(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<PayoutSummary>> {
    let balance = state.gateway.balance_cents(&user).await?;
    let today = Utc::now().date_naive();

    Ok(Json(PayoutSummary::compute(balance, &state.payout, today)))
}

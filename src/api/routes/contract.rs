//! Contract Routes
//!
//! - POST /api/v1/contract - Sign the contract agreement

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::identity::CurrentUser;
use crate::api::state::AppState;
use crate::contract::{self, ContractReceipt, ContractSubmission};

/// POST /api/v1/contract
pub async fn sign_contract(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ContractSubmission>,
) -> ApiResult<(StatusCode, Json<ContractReceipt>)> {
    let receipt = contract::submit(state.gateway.as_ref(), &user, &req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

//! Channel Routes
//!
//! Channel analytics for the signed-in user.
//!
//! - GET /api/v1/channels - Load channel summaries
//! - GET /api/v1/channels/selected - Get the active channel
//! - PUT /api/v1/channels/selected - Change the active channel

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::analytics::AnalyticsError;
use crate::api::dto::{ChannelsResponse, SelectChannelRequest, SelectionResponse};
use crate::api::error::ApiResult;
use crate::api::identity::CurrentUser;
use crate::api::state::AppState;

/// GET /api/v1/channels
///
/// Reads linked channels and view history, aggregates them and installs
/// the fresh list as the user's selection list.
pub async fn list_channels(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<ChannelsResponse>> {
    let channels = match state.analytics.load(&user).await {
        Ok(channels) => channels,
        Err(AnalyticsError::NoChannelsLinked) => {
            state.selections.write().await.remove(&user);
            return Err(AnalyticsError::NoChannelsLinked.into());
        }
        Err(e) => return Err(e.into()),
    };

    let mut selections = state.selections.write().await;
    let selection = selections.entry(user).or_default();
    selection.replace(channels);

    Ok(Json(ChannelsResponse {
        channels: selection.channels().to_vec(),
        selected: selection.current().cloned(),
    }))
}

/// GET /api/v1/channels/selected
///
/// The active channel, or null before the first load.
pub async fn get_selected(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Json<SelectionResponse> {
    let selections = state.selections.read().await;
    let selected = selections.get(&user).and_then(|s| s.current()).cloned();

    Json(SelectionResponse {
        selected,
        changed: false,
    })
}

/// PUT /api/v1/channels/selected
///
/// Selects a channel from the last loaded list. An unknown URL is logged
/// and ignored; the response then carries the unchanged selection.
pub async fn select_channel(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<SelectChannelRequest>,
) -> Json<SelectionResponse> {
    let mut selections = state.selections.write().await;

    // Users without a loaded list get no entry; every URL is unknown to them.
    let Some(selection) = selections.get_mut(&user) else {
        let e = AnalyticsError::UnknownChannelSelected(req.url);
        tracing::warn!(user = %user, error = %e, "Ignoring channel selection");
        return Json(SelectionResponse {
            selected: None,
            changed: false,
        });
    };

    let changed = match selection.select(&req.url) {
        Ok(channel) => {
            tracing::debug!(user = %user, url = %channel.url, "Channel selected");
            true
        }
        Err(e) => {
            tracing::warn!(user = %user, error = %e, "Ignoring channel selection");
            false
        }
    };

    Json(SelectionResponse {
        selected: selection.current().cloned(),
        changed,
    })
}

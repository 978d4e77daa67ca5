//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::analytics::LinkedChannel;

// ============================================
// CHANNEL DTOs
// ============================================

/// Dashboard channel list with the active channel
#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelsResponse {
    pub channels: Vec<LinkedChannel>,
    pub selected: Option<LinkedChannel>,
}

/// Select-channel request
#[derive(Debug, Deserialize)]
pub struct SelectChannelRequest {
    /// URL of the channel to show
    pub url: String,
}

/// Current selection after a select request
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub selected: Option<LinkedChannel>,
    /// False when the request was ignored
    pub changed: bool,
}

// ============================================
// STATISTICS DTOs
// ============================================

/// Statistics function request
#[derive(Debug, Deserialize)]
pub struct StatisticsRequest {
    /// Channel URLs to fetch statistics for
    pub urls: Vec<String>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// Gateway implementation in use
    pub gateway: String,
    /// "ok" or "error"
    pub gateway_status: String,
    pub uptime_seconds: u64,
    pub version: String,
}

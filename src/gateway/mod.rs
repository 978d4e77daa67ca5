//! Remote Data Gateway
//!
//! The hosted backend-as-a-service this system reads from and writes to.
//!
//! ## Implementations
//!
//! - **RestGateway**: database REST endpoints + edge functions over HTTP
//! - **InMemoryGateway**: fixed data, for tests and offline runs
//!
//! Every data call takes the caller's [`UserId`] explicitly; there is no
//! ambient session.

mod client;
mod memory;

pub use client::RestGateway;
pub use memory::InMemoryGateway;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::analytics::MonthlyViewRecord;
use crate::contract::ContractSubmission;

/// Identity of the signed-in user whose data is being read
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user id, returning None for a blank value
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operations the dashboard needs from the backend
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Short name used in logs and health output
    fn name(&self) -> &str;

    /// Check that the backend is reachable
    async fn health_check(&self) -> Result<(), GatewayError>;

    /// Channel URLs linked to the user's account (empty when none)
    async fn linked_channels(&self, user: &UserId) -> Result<Vec<String>, GatewayError>;

    /// Monthly view history of the user's channels, most recent month first
    async fn monthly_views(&self, user: &UserId) -> Result<Vec<MonthlyViewRecord>, GatewayError>;

    /// Invoke the remote statistics function; the response is passed through as-is
    async fn invoke_statistics(&self, urls: &[String]) -> Result<serde_json::Value, GatewayError>;

    /// Current payout balance in cents (0 when no balance row exists)
    async fn balance_cents(&self, user: &UserId) -> Result<u64, GatewayError>;

    /// Persist a signed contract agreement, returning the stored record id
    async fn save_contract(
        &self,
        user: &UserId,
        contract: &ContractSubmission,
        signed_at: DateTime<Utc>,
    ) -> Result<String, GatewayError>;
}

/// Errors that can occur when talking to the backend
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Rate limited")]
    RateLimited,

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl GatewayError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_connect() {
            GatewayError::Unavailable
        } else {
            GatewayError::Request(e)
        }
    }

    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::Unavailable | GatewayError::Timeout | GatewayError::RateLimited
        )
    }
}

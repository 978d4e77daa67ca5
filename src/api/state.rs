//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::analytics::{AnalyticsService, SelectionState};
use crate::config::{ApiConfig, PayoutConfig};
use crate::gateway::{Gateway, UserId};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Backend the dashboard reads from
    pub gateway: Arc<dyn Gateway>,
    /// Channel loading over the gateway
    pub analytics: Arc<AnalyticsService>,
    /// Selected channel per user
    pub selections: Arc<RwLock<HashMap<UserId, SelectionState>>>,
    /// Payout display settings
    pub payout: Arc<PayoutConfig>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>, config: ApiConfig, payout: PayoutConfig) -> Self {
        Self {
            analytics: Arc::new(AnalyticsService::new(Arc::clone(&gateway))),
            gateway,
            selections: Arc::new(RwLock::new(HashMap::new())),
            payout: Arc::new(payout),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

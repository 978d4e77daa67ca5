//! Analytics error types
//!
//! Every variant is recoverable at the presentation boundary.

use thiserror::Error;

use crate::gateway::GatewayError;

/// Errors that can occur while loading or selecting channels
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// The user has no linked channels
    #[error("No channels linked to your account")]
    NoChannelsLinked,

    /// One of the two gateway reads failed
    #[error("Failed to load channel data: {0}")]
    UpstreamReadFailure(#[source] GatewayError),

    /// A selection referenced a URL absent from the current list
    #[error("Unknown channel: {0}")]
    UnknownChannelSelected(String),
}

/// Result type for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

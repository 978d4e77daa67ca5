//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes. Every message is
//! meant to be shown to the user as-is.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::contract::ContractError;
use crate::gateway::GatewayError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// No user identity on the request
    #[error("Missing user identity: send the x-user-id header")]
    MissingIdentity,

    /// Channel loading or selection failed
    #[error("{0}")]
    Analytics(#[from] AnalyticsError),

    /// A pass-through gateway call failed
    #[error("Backend error: {0}")]
    Gateway(#[from] GatewayError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ContractError> for ApiError {
    fn from(e: ContractError) -> Self {
        match e {
            ContractError::Gateway(e) => ApiError::Gateway(e),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            // No route returns an unknown selection as an error; it maps like bad input.
            ApiError::Validation(_)
            | ApiError::Analytics(AnalyticsError::UnknownChannelSelected(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApiError::MissingIdentity => (StatusCode::UNAUTHORIZED, "MISSING_IDENTITY"),
            ApiError::Analytics(AnalyticsError::NoChannelsLinked) => {
                (StatusCode::NOT_FOUND, "NO_CHANNELS_LINKED")
            }
            ApiError::Analytics(AnalyticsError::UpstreamReadFailure(_)) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_READ_FAILURE")
            }
            ApiError::Gateway(_) => (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }

    /// Message shown to the user, with a next step where one exists
    fn user_message(&self) -> String {
        match self {
            ApiError::Analytics(AnalyticsError::NoChannelsLinked) => format!(
                "{}. Please link your YouTube channels through the onboarding process, then refresh.",
                self
            ),
            ApiError::Analytics(AnalyticsError::UpstreamReadFailure(_)) => {
                "Failed to load channel data. Refresh to try again.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.user_message(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

//! Request identity
//!
//! The signed-in user arrives in the `x-user-id` header, set by the
//! authenticating proxy in front of this service.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::api::error::ApiError;
use crate::gateway::UserId;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the caller's [`UserId`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(UserId::new)
            .map(CurrentUser)
            .ok_or(ApiError::MissingIdentity)
    }
}

//! Analytics Service
//!
//! One dashboard load: read linked channels and view history for a user,
//! then aggregate them.

use std::sync::Arc;
use std::time::Instant;

use super::aggregator::aggregate;
use super::error::{AnalyticsError, AnalyticsResult};
use super::types::LinkedChannel;
use crate::gateway::{Gateway, GatewayError, UserId};

/// Loads channel summaries through a [`Gateway`]
pub struct AnalyticsService {
    gateway: Arc<dyn Gateway>,
}

impl AnalyticsService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    /// Load and aggregate the channels of `user`
    ///
    /// Both reads are issued concurrently. Either failing yields
    /// [`AnalyticsError::UpstreamReadFailure`]; no linked channels yields
    /// [`AnalyticsError::NoChannelsLinked`].
    pub async fn load(&self, user: &UserId) -> AnalyticsResult<Vec<LinkedChannel>> {
        let start = Instant::now();

        let (links, views) = tokio::join!(
            self.gateway.linked_channels(user),
            self.gateway.monthly_views(user)
        );

        let links = links.map_err(|e| {
            tracing::error!(user = %user, error = %e, "Failed to read linked channels");
            AnalyticsError::UpstreamReadFailure(e)
        })?;

        if links.is_empty() {
            tracing::info!(user = %user, "No channels linked");
            return Err(AnalyticsError::NoChannelsLinked);
        }

        let views = views.map_err(|e| {
            tracing::error!(user = %user, error = %e, "Failed to read channel views");
            AnalyticsError::UpstreamReadFailure(e)
        })?;

        let channels = aggregate(&links, &views)?;

        tracing::debug!(
            user = %user,
            channels = channels.len(),
            records = views.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Channel analytics loaded"
        );

        Ok(channels)
    }

    /// Pass-through to the remote statistics function
    pub async fn statistics(&self, urls: &[String]) -> Result<serde_json::Value, GatewayError> {
        self.gateway.invoke_statistics(urls).await.map_err(|e| {
            tracing::error!(error = %e, urls = urls.len(), "Statistics function failed");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{Month, MonthlyViewRecord};
    use crate::gateway::InMemoryGateway;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[tokio::test]
    async fn test_load_aggregates_both_reads() {
        let gateway = InMemoryGateway::new()
            .with_channels(user(), ["https://youtube.com/@a"])
            .with_views(
                user(),
                vec![
                    MonthlyViewRecord::new("https://youtube.com/@a", Month::new(2025, 1).unwrap(), 100),
                    MonthlyViewRecord::new("https://youtube.com/@a", Month::new(2025, 2).unwrap(), 150),
                ],
            );
        let service = AnalyticsService::new(Arc::new(gateway));

        let channels = service.load(&user()).await.unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].display_name, "@a");
        assert_eq!(channels[0].monthly_views, 150);
        assert!((channels[0].growth - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_load_without_links() {
        let service = AnalyticsService::new(Arc::new(InMemoryGateway::new()));

        let result = service.load(&user()).await;
        assert!(matches!(result, Err(AnalyticsError::NoChannelsLinked)));
    }

    #[tokio::test]
    async fn test_load_upstream_failure() {
        let gateway = InMemoryGateway::new().with_channels(user(), ["https://youtube.com/@a"]);
        gateway.set_failing(true);
        let service = AnalyticsService::new(Arc::new(gateway));

        let result = service.load(&user()).await;
        assert!(matches!(result, Err(AnalyticsError::UpstreamReadFailure(_))));
    }

    #[tokio::test]
    async fn test_load_views_failure_only() {
        let gateway = InMemoryGateway::new().with_channels(user(), ["https://youtube.com/@a"]);
        gateway.set_views_failing(true);
        let service = AnalyticsService::new(Arc::new(gateway));

        let result = service.load(&user()).await;
        assert!(matches!(result, Err(AnalyticsError::UpstreamReadFailure(_))));
    }

    #[tokio::test]
    async fn test_load_without_links_ignores_views_failure() {
        let gateway = InMemoryGateway::new();
        gateway.set_views_failing(true);
        let service = AnalyticsService::new(Arc::new(gateway));

        let result = service.load(&user()).await;
        assert!(matches!(result, Err(AnalyticsError::NoChannelsLinked)));
    }

    #[tokio::test]
    async fn test_statistics_pass_through() {
        let service = AnalyticsService::new(Arc::new(InMemoryGateway::new()));
        let urls = vec!["https://youtube.com/@a".to_string()];

        let value = service.statistics(&urls).await.unwrap();
        assert_eq!(value["channels"][0]["url"], "https://youtube.com/@a");
    }
}

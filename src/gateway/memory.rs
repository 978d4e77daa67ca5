//! In-memory gateway
//!
//! Serves fixed data without a backend. Used by tests and by the server
//! when no backend URL is configured.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

use super::{Gateway, GatewayError, UserId};
use crate::analytics::{Month, MonthlyViewRecord};
use crate::contract::ContractSubmission;

/// Gateway backed by in-process maps
#[derive(Default)]
pub struct InMemoryGateway {
    links: RwLock<HashMap<UserId, Vec<String>>>,
    views: RwLock<HashMap<UserId, Vec<MonthlyViewRecord>>>,
    balances: RwLock<HashMap<UserId, u64>>,
    contracts: RwLock<HashMap<UserId, Vec<ContractSubmission>>>,
    fail_reads: AtomicBool,
    fail_views: AtomicBool,
    next_contract_id: AtomicU64,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample data for the `demo` user: two channels with three months of history
    pub fn demo() -> Self {
        let Some(user) = UserId::new("demo") else {
            return Self::new();
        };
        let alpha = "https://www.youtube.com/@alpha-studio";
        let beta = "https://www.youtube.com/@beta-plays";
        let month = |y, m| Month::new(y, m).unwrap_or_else(|| Month::of(Utc::now().date_naive()));

        Self::new()
            .with_channels(user.clone(), [alpha, beta])
            .with_views(
                user.clone(),
                vec![
                    MonthlyViewRecord::new(alpha, month(2025, 3), 18_400),
                    MonthlyViewRecord::new(alpha, month(2025, 2), 15_200),
                    MonthlyViewRecord::new(alpha, month(2025, 1), 12_950),
                    MonthlyViewRecord::new(beta, month(2025, 3), 4_100),
                    MonthlyViewRecord::new(beta, month(2025, 2), 5_000),
                ],
            )
            .with_balance(user, 4_250)
    }

    pub fn with_channels<I, S>(mut self, user: UserId, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links
            .get_mut()
            .insert(user, urls.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_views(mut self, user: UserId, records: Vec<MonthlyViewRecord>) -> Self {
        self.views.get_mut().insert(user, records);
        self
    }

    pub fn with_balance(mut self, user: UserId, cents: u64) -> Self {
        self.balances.get_mut().insert(user, cents);
        self
    }

    /// Make every read fail with [`GatewayError::Unavailable`]
    pub fn set_failing(&self, failing: bool) {
        self.fail_reads.store(failing, Ordering::SeqCst);
    }

    /// Make only the monthly views read fail with [`GatewayError::Unavailable`]
    pub fn set_views_failing(&self, failing: bool) {
        self.fail_views.store(failing, Ordering::SeqCst);
    }

    /// Contracts stored for `user`, oldest first
    pub async fn contracts(&self, user: &UserId) -> Vec<ContractSubmission> {
        self.contracts
            .read()
            .await
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), GatewayError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(GatewayError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Gateway for InMemoryGateway {
    fn name(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), GatewayError> {
        self.check_available()
    }

    async fn linked_channels(&self, user: &UserId) -> Result<Vec<String>, GatewayError> {
        self.check_available()?;
        Ok(self.links.read().await.get(user).cloned().unwrap_or_default())
    }

    async fn monthly_views(&self, user: &UserId) -> Result<Vec<MonthlyViewRecord>, GatewayError> {
        self.check_available()?;
        if self.fail_views.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable);
        }
        let mut records = self.views.read().await.get(user).cloned().unwrap_or_default();
        records.sort_by(|a, b| b.month.cmp(&a.month));
        Ok(records)
    }

    async fn invoke_statistics(&self, urls: &[String]) -> Result<serde_json::Value, GatewayError> {
        self.check_available()?;
        let channels: Vec<serde_json::Value> = urls
            .iter()
            .map(|url| serde_json::json!({ "url": url }))
            .collect();
        Ok(serde_json::json!({ "channels": channels }))
    }

    async fn balance_cents(&self, user: &UserId) -> Result<u64, GatewayError> {
        self.check_available()?;
        Ok(self.balances.read().await.get(user).copied().unwrap_or(0))
    }

    async fn save_contract(
        &self,
        user: &UserId,
        contract: &ContractSubmission,
        _signed_at: DateTime<Utc>,
    ) -> Result<String, GatewayError> {
        self.check_available()?;
        self.contracts
            .write()
            .await
            .entry(user.clone())
            .or_default()
            .push(contract.clone());
        let id = self.next_contract_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_user_reads_empty() {
        let gateway = InMemoryGateway::new();
        let user = UserId::new("nobody").unwrap();

        assert!(gateway.linked_channels(&user).await.unwrap().is_empty());
        assert!(gateway.monthly_views(&user).await.unwrap().is_empty());
        assert_eq!(gateway.balance_cents(&user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_views_come_back_most_recent_first() {
        let gateway = InMemoryGateway::demo();
        let user = UserId::new("demo").unwrap();

        let records = gateway.monthly_views(&user).await.unwrap();
        assert!(records.windows(2).all(|w| w[0].month >= w[1].month));
    }

    #[tokio::test]
    async fn test_failing_reads() {
        let gateway = InMemoryGateway::demo();
        let user = UserId::new("demo").unwrap();
        gateway.set_failing(true);

        assert!(matches!(
            gateway.linked_channels(&user).await,
            Err(GatewayError::Unavailable)
        ));
        assert!(gateway.health_check().await.is_err());
    }

    #[tokio::test]
    async fn test_views_failing_leaves_other_reads() {
        let gateway = InMemoryGateway::demo();
        let user = UserId::new("demo").unwrap();
        gateway.set_views_failing(true);

        assert!(matches!(
            gateway.monthly_views(&user).await,
            Err(GatewayError::Unavailable)
        ));
        assert_eq!(gateway.linked_channels(&user).await.unwrap().len(), 2);
        assert!(gateway.health_check().await.is_ok());
    }
}

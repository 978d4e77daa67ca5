//! REST gateway client
//!
//! HTTP client for the hosted backend: table reads and inserts go through
//! the database REST endpoint (`/rest/v1/<table>`), the statistics call
//! goes through the edge function endpoint (`/functions/v1/<name>`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{Gateway, GatewayError, UserId};
use crate::analytics::MonthlyViewRecord;
use crate::config::GatewayConfig;
use crate::contract::{ContractSubmission, Signature};

/// Gateway talking to the backend over HTTP
pub struct RestGateway {
    client: Client,
    config: GatewayConfig,
}

impl RestGateway {
    /// Create a new client with the given configuration
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("creatordash/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn table_url(&self, table: &str, query: &str) -> String {
        format!(
            "{}/rest/v1/{}?{}",
            self.base_url(),
            urlencoding::encode(table),
            query
        )
    }

    fn function_url(&self, name: &str) -> String {
        format!("{}/functions/v1/{}", self.base_url(), urlencoding::encode(name))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    /// Send a request with retry logic
    ///
    /// With `retry`, timeouts, connection failures and 429 responses are
    /// retried up to `max_retries` attempts. Without it the request is sent
    /// exactly once. Other error statuses are returned at once.
    async fn execute(&self, request: RequestBuilder, retry: bool) -> Result<Response, GatewayError> {
        let request = self.authorize(request);
        let mut last_error = GatewayError::Unavailable;
        let attempts = if retry { self.config.max_retries.max(1) } else { 1 };

        for attempt in 0..attempts {
            if attempt > 0 {
                // Backoff: 1s, 4s, 9s...
                let delay = std::time::Duration::from_secs((attempt as u64).pow(2));
                tokio::time::sleep(delay).await;
            }

            let Some(attempt_request) = request.try_clone() else {
                return Err(GatewayError::Decode("request body is not replayable".into()));
            };

            match attempt_request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) if response.status().as_u16() == 429 => {
                    if let Some(secs) = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                    {
                        tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
                    }
                    tracing::debug!(attempt, "Backend rate limited request");
                    last_error = GatewayError::RateLimited;
                }
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    return Err(GatewayError::ApiError {
                        status: status.as_u16(),
                        message: text,
                    });
                }
                Err(e) => {
                    last_error = GatewayError::from_transport(e);
                    tracing::debug!(attempt, error = %last_error, "Backend request failed");
                }
            }
        }

        Err(last_error)
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &str,
    ) -> Result<Vec<T>, GatewayError> {
        let url = self.table_url(table, query);
        let response = self.execute(self.client.get(&url), true).await?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

fn user_filter(user: &UserId) -> String {
    format!("user_id=eq.{}", urlencoding::encode(user.as_str()))
}

#[async_trait]
impl Gateway for RestGateway {
    fn name(&self) -> &str {
        "rest"
    }

    async fn health_check(&self) -> Result<(), GatewayError> {
        let url = format!("{}/rest/v1/", self.base_url());

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(GatewayError::Unavailable)
        }
    }

    async fn linked_channels(&self, user: &UserId) -> Result<Vec<String>, GatewayError> {
        let query = format!("select=youtube_links&{}&limit=1", user_filter(user));
        let rows: Vec<LinkedChannelsRow> = self
            .fetch_rows(&self.config.tables.linked_channels, &query)
            .await?;

        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.youtube_links)
            .unwrap_or_default())
    }

    async fn monthly_views(&self, user: &UserId) -> Result<Vec<MonthlyViewRecord>, GatewayError> {
        let query = format!("select=*&{}&order=month.desc", user_filter(user));
        self.fetch_rows(&self.config.tables.channel_views, &query)
            .await
    }

    async fn invoke_statistics(&self, urls: &[String]) -> Result<serde_json::Value, GatewayError> {
        let url = self.function_url(&self.config.statistics_function);
        let body = StatisticsRequest { youtube_urls: urls };

        let response = self.execute(self.client.post(&url).json(&body), true).await?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn balance_cents(&self, user: &UserId) -> Result<u64, GatewayError> {
        let query = format!("select=balance_cents&{}&limit=1", user_filter(user));
        let rows: Vec<BalanceRow> = self.fetch_rows(&self.config.tables.balances, &query).await?;

        Ok(rows.first().map(|row| row.balance_cents).unwrap_or(0))
    }

    async fn save_contract(
        &self,
        user: &UserId,
        contract: &ContractSubmission,
        signed_at: DateTime<Utc>,
    ) -> Result<String, GatewayError> {
        let url = self.table_url(&self.config.tables.contracts, "select=id");
        let row = ContractRow::new(user, contract, signed_at);

        // Sent once; a timed-out insert may already be committed.
        let response = self
            .execute(
                self.client
                    .post(&url)
                    .header("Prefer", "return=representation")
                    .json(&row),
                false,
            )
            .await?;

        let inserted: Vec<InsertedRow> = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        inserted
            .into_iter()
            .next()
            .map(|row| match row.id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .ok_or_else(|| GatewayError::Decode("insert returned no rows".into()))
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Deserialize)]
struct LinkedChannelsRow {
    youtube_links: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct BalanceRow {
    balance_cents: u64,
}

#[derive(Debug, Serialize)]
struct StatisticsRequest<'a> {
    #[serde(rename = "youtubeUrls")]
    youtube_urls: &'a [String],
}

#[derive(Debug, Serialize)]
struct ContractRow<'a> {
    user_id: &'a str,
    legal_name: &'a str,
    street_address: &'a str,
    city: &'a str,
    state_province: &'a str,
    postal_code: &'a str,
    country: &'a str,
    signature_method: &'static str,
    signature_text: Option<&'a str>,
    signature_image: Option<&'a str>,
    signed_at: DateTime<Utc>,
}

impl<'a> ContractRow<'a> {
    fn new(user: &'a UserId, contract: &'a ContractSubmission, signed_at: DateTime<Utc>) -> Self {
        let (signature_text, signature_image) = match &contract.signature {
            Signature::Typed { text } => (Some(text.as_str()), None),
            Signature::Drawn { data_url } => (None, Some(data_url.as_str())),
        };

        Self {
            user_id: user.as_str(),
            legal_name: &contract.legal_name,
            street_address: &contract.street_address,
            city: &contract.city,
            state_province: &contract.state_province,
            postal_code: &contract.postal_code,
            country: &contract.country,
            signature_method: contract.signature.method(),
            signature_text,
            signature_image,
            signed_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InsertedRow {
    id: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> RestGateway {
        RestGateway::new(GatewayConfig::new("https://project.example.co/", "anon-key")).unwrap()
    }

    #[test]
    fn test_table_url() {
        let gw = gateway();
        let user = UserId::new("a b").unwrap();

        assert_eq!(
            gw.table_url("channel_views", &user_filter(&user)),
            "https://project.example.co/rest/v1/channel_views?user_id=eq.a%20b"
        );
    }

    #[test]
    fn test_function_url_encodes_name() {
        let gw = gateway();
        assert_eq!(
            gw.function_url("get statistics"),
            "https://project.example.co/functions/v1/get%20statistics"
        );
    }

    #[test]
    fn test_statistics_body_shape() {
        let urls = vec!["https://youtube.com/@a".to_string()];
        let body = serde_json::to_value(StatisticsRequest { youtube_urls: &urls }).unwrap();

        assert_eq!(body, serde_json::json!({ "youtubeUrls": ["https://youtube.com/@a"] }));
    }

    #[test]
    fn test_linked_channels_row_allows_null() {
        let rows: Vec<LinkedChannelsRow> =
            serde_json::from_str(r#"[{"youtube_links": null}]"#).unwrap();
        assert!(rows[0].youtube_links.is_none());
    }

    #[test]
    fn test_contract_row_splits_signature() {
        let user = UserId::new("u1").unwrap();
        let contract = ContractSubmission {
            legal_name: "Jane".into(),
            street_address: "1 Main St".into(),
            city: "Springfield".into(),
            state_province: "IL".into(),
            postal_code: "62701".into(),
            country: "US".into(),
            signature: Signature::Drawn {
                data_url: "data:image/png;base64,AAAA".into(),
            },
        };

        let row = serde_json::to_value(ContractRow::new(&user, &contract, Utc::now())).unwrap();
        assert_eq!(row["signature_method"], "drawn");
        assert!(row["signature_text"].is_null());
        assert_eq!(row["signature_image"], "data:image/png;base64,AAAA");
    }

    #[tokio::test]
    async fn test_contract_insert_is_sent_once_on_timeout() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use tokio::io::AsyncReadExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let counter = Arc::clone(&counter);
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    if let Ok(n) = socket.read(&mut buf).await {
                        if buf[..n].starts_with(b"POST") {
                            counter.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                    // Never answer within the client timeout.
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                });
            }
        });

        let mut config = GatewayConfig::new(format!("http://{}", addr), "anon-key");
        config.request_timeout_ms = 200;
        config.max_retries = 3;
        let gw = RestGateway::new(config).unwrap();

        let user = UserId::new("u1").unwrap();
        let contract = ContractSubmission {
            legal_name: "Jane".into(),
            street_address: "1 Main St".into(),
            city: "Springfield".into(),
            state_province: "IL".into(),
            postal_code: "62701".into(),
            country: "US".into(),
            signature: Signature::Typed { text: "Jane".into() },
        };

        let result = gw.save_contract(&user, &contract, Utc::now()).await;
        assert!(matches!(result, Err(GatewayError::Timeout)));

        // Give a second attempt time to arrive if one were sent.
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }
}

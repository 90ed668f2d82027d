use async_trait::async_trait;
use dmex_core::{ExtractionResult, OrderSink};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::{Result, SubmitError};
use crate::retry::{RetryPolicy, retry_with_backoff};

pub const DEFAULT_ENDPOINT: &str = "https://alert-api.com/DrExtract";

/// Intake API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_endpoint")]
    pub endpoint: String,
    #[serde(default = "ApiConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            timeout_secs: Self::default_timeout_secs(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ApiConfig {
    fn default_endpoint() -> String {
        DEFAULT_ENDPOINT.to_string()
    }

    const fn default_timeout_secs() -> u64 {
        30
    }

    /// Hosts that are placeholders or local test servers.
    #[must_use]
    pub fn is_test_endpoint(&self) -> bool {
        ["alert-api.com", "test", "localhost"]
            .iter()
            .any(|marker| self.endpoint.contains(marker))
    }
}

/// Posts extraction results to the intake API as JSON.
pub struct DmeApiClient {
    client: Client,
    config: ApiConfig,
}

impl DmeApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        info!("Creating DmeApiClient for {}", config.endpoint);
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Wire payload for `order`: only fields that are set.
    pub fn payload(order: &ExtractionResult) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(order)?)
    }

    /// Submit `order`, retrying transient failures. Returns the response body.
    pub async fn submit_order(&self, order: &ExtractionResult) -> Result<String> {
        info!(
            "Preparing to submit DME data to API endpoint: {}",
            self.config.endpoint
        );
        let payload = Self::payload(order)?;
        info!("Generated JSON payload for submission: {payload}");

        if self.config.is_test_endpoint() {
            warn!(
                "Submitting to a test/placeholder endpoint: {}. Set api.endpoint or DMEX_API_ENDPOINT for a real intake API",
                self.config.endpoint
            );
        }

        let body = retry_with_backoff(
            || self.try_send(&payload),
            &self.config.retry,
            SubmitError::is_retryable,
        )
        .await
        .inspect_err(|e| error!("API submission to {} failed: {e}", self.config.endpoint))?;

        info!("API submission successful. Response: {body}");
        Ok(body)
    }

    async fn try_send(&self, payload: &serde_json::Value) -> Result<String> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!("API response received. Status: {status}");

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn transport_error(&self, e: reqwest::Error) -> SubmitError {
        if e.is_timeout() {
            SubmitError::Timeout {
                seconds: self.config.timeout_secs,
            }
        } else {
            SubmitError::Transport(e)
        }
    }
}

#[async_trait]
impl OrderSink for DmeApiClient {
    async fn submit(&self, order: &ExtractionResult) -> anyhow::Result<()> {
        self.submit_order(order).await?;
        Ok(())
    }
}

//! Webhook delivery channel
//!
//! Posts rendered schedule messages to a chat webhook as
//! `{"message": "..."}` JSON.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Webhook channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Webhook URL endpoint
    pub url: String,
    /// Optional authentication token (sent as Bearer token)
    pub auth_token: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum retry attempts on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    3
}

impl WebhookConfig {
    /// Create a new webhook configuration
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }

    /// Set authentication token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set max retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::config("webhook URL cannot be empty"));
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(Error::config("webhook URL must start with http:// or https://"));
        }

        if self.timeout_secs == 0 {
            return Err(Error::config("webhook timeout must be greater than 0"));
        }

        Ok(())
    }
}

impl From<&crate::config::WebhookSettings> for WebhookConfig {
    fn from(settings: &crate::config::WebhookSettings) -> Self {
        Self {
            url: settings.url.clone(),
            auth_token: settings.auth_token.clone(),
            timeout_secs: settings.timeout_secs,
            max_retries: settings.max_retries,
        }
    }
}

/// Webhook notifier posting schedule messages to a chat endpoint
pub struct WebhookNotifier {
    config: WebhookConfig,
    client: Client,
}

impl WebhookNotifier {
    /// Create a new webhook notifier
    pub fn new(config: WebhookConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Get the webhook URL
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Post one rendered message, retrying transient failures.
    ///
    /// Network errors and 5xx responses are retried with exponential
    /// backoff (1s, 2s, 4s...); 4xx responses fail immediately since a
    /// retry cannot fix the request.
    pub async fn send(&self, message: &str) -> Result<()> {
        let payload = serde_json::json!({ "message": message });
        let mut last_error: Option<Error> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(2_u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
                tracing::debug!(
                    attempt = attempt + 1,
                    max = self.config.max_retries + 1,
                    "retrying webhook delivery"
                );
            }

            let mut request = self.client.post(&self.config.url);
            if let Some(token) = &self.config.auth_token {
                request = request.bearer_auth(token);
            }

            match request.json(&payload).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        tracing::info!(url = %self.config.url, %status, "webhook delivered");
                        return Ok(());
                    }

                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| String::from("unable to read response body"));
                    last_error = Some(Error::delivery(format!("HTTP {status}: {body}")));

                    // Client errors will not get better on retry.
                    if status.is_client_error() {
                        break;
                    }
                }
                Err(e) => {
                    last_error = Some(Error::Http(e));
                }
            }
        }

        let err = last_error.unwrap_or_else(|| Error::delivery("unknown delivery failure"));
        tracing::error!(url = %self.config.url, error = %err, "webhook delivery failed");
        Err(err)
    }
}

//! Webhook alert delivery.
//!
//! [`WebhookNotifier`] POSTs a JSON-encoded alert to a single external URL.
//! Delivery is at-most-once: a failed attempt is reported, never retried.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::notifier::{NotifyError, Notifier};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// WebhookConfig
// ---------------------------------------------------------------------------

/// Where to POST alerts.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
}

impl WebhookConfig {
    /// Returns `None` if `ALERT_WEBHOOK_URL` is not set.
    pub fn from_env() -> Option<Self> {
        std::env::var("ALERT_WEBHOOK_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .map(|url| Self { url })
    }
}

// ---------------------------------------------------------------------------
// WebhookNotifier
// ---------------------------------------------------------------------------

/// Delivers alerts to an external webhook endpoint.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a notifier with a pre-configured HTTP client.
    pub fn new(config: WebhookConfig) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            url: config.url,
            client,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let payload = serde_json::json!({
            "subject": subject,
            "body": body,
            "timestamp": Utc::now(),
        });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(WebhookError::from)?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()).into());
        }

        tracing::info!(url = %self.url, subject, "Alert webhook delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn status_error_display() {
        let err = WebhookError::HttpStatus(503);
        assert_eq!(err.to_string(), "Webhook returned HTTP 503");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let notifier = WebhookNotifier::new(WebhookConfig {
            url: "http://127.0.0.1:1/alerts".to_string(),
        })
        .unwrap();
        let result = notifier.notify("Rain Alert", "Rain status: rain").await;
        assert_matches!(result, Err(NotifyError::Webhook(WebhookError::Request(_))));
    }
}

//! The notifier capability.

use async_trait::async_trait;

use crate::delivery::email::EmailError;
use crate::delivery::webhook::WebhookError;

/// Error type for a single notification attempt.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    /// The notifier did not finish within the dispatch timeout.
    #[error("Notification timed out after {after_ms}ms")]
    TimedOut { after_ms: u128 },

    /// Any other channel-specific failure.
    #[error("Notification failed: {0}")]
    Other(String),
}

/// Delivers an alert message to a human recipient.
///
/// The transport behind it (email, webhook, ...) is opaque to callers.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name used in logs (e.g. `"email"`).
    fn name(&self) -> &'static str;

    /// Send one message.
    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}

//! Email alert delivery via SMTP.
//!
//! [`EmailNotifier`] wraps the `lettre` async SMTP transport to send
//! plain-text alert emails to a fixed recipient list. If the credentials or
//! recipients are not configured, [`EmailConfig::from_env`] returns `None` and
//! no notifier should be constructed.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::notifier::{NotifyError, Notifier};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP host.
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default SMTP port (implicit TLS).
const DEFAULT_SMTP_PORT: u16 = 465;

/// Port on which the server expects TLS from the first byte.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Configuration for the SMTP email notifier.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port. 465 uses implicit TLS, anything else STARTTLS.
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    /// RFC 5322 "From" address (defaults to the SMTP user).
    pub from_address: String,
    /// Alert recipients.
    pub recipients: Vec<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless a user, a password and at least one recipient
    /// are set.
    ///
    /// | Variable      | Required | Default          |
    /// |---------------|----------|------------------|
    /// | `SMTP_USER`   | yes      | -                |
    /// | `SMTP_PASS`   | yes      | -                |
    /// | `ALERT_TO`    | yes      | (comma-separated)  |
    /// | `SMTP_HOST`   | no       | `smtp.gmail.com` |
    /// | `SMTP_PORT`   | no       | `465`            |
    /// | `SMTP_FROM`   | no       | `SMTP_USER`      |
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let smtp_user = non_empty("SMTP_USER")?;
        let smtp_password = non_empty("SMTP_PASS")?;
        let recipients: Vec<String> = non_empty("ALERT_TO")?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if recipients.is_empty() {
            return None;
        }

        Some(Self {
            smtp_host: non_empty("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: non_empty("SMTP_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: non_empty("SMTP_FROM").unwrap_or_else(|| smtp_user.clone()),
            smtp_user,
            smtp_password,
            recipients,
        })
    }
}

// ---------------------------------------------------------------------------
// EmailNotifier
// ---------------------------------------------------------------------------

/// Sends alert emails via SMTP.
pub struct EmailNotifier {
    from: Mailbox,
    recipients: Vec<Mailbox>,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailNotifier {
    /// Validate addresses and build the SMTP transport.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config.from_address.parse()?;
        let recipients = config
            .recipients
            .iter()
            .map(|r| r.parse::<Mailbox>())
            .collect::<Result<Vec<_>, _>>()?;

        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        };
        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(config.smtp_user, config.smtp_password))
            .build();

        Ok(Self {
            from,
            recipients,
            transport,
        })
    }
}

/// Assemble a plain-text alert message addressed to every recipient.
fn build_message(
    from: &Mailbox,
    recipients: &[Mailbox],
    subject: &str,
    body: &str,
) -> Result<Message, EmailError> {
    let mut builder = Message::builder()
        .from(from.clone())
        .subject(subject)
        .header(ContentType::TEXT_PLAIN);
    for recipient in recipients {
        builder = builder.to(recipient.clone());
    }
    builder
        .body(body.to_string())
        .map_err(|e| EmailError::Build(e.to_string()))
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = build_message(&self.from, &self.recipients, subject, body)?;
        self.transport
            .send(message)
            .await
            .map_err(EmailError::from)?;

        tracing::info!(
            recipients = self.recipients.len(),
            subject,
            "Alert email sent"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

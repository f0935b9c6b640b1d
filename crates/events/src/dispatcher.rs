//! Alert dispatch with bounded timeouts.
//!
//! [`AlertDispatcher`] hands each [`AlertEvent`] to every configured
//! [`Notifier`]. Every call is wrapped in `tokio::time::timeout`; failures and
//! timeouts are logged and reported, never retried and never propagated.
//! [`spawn_dispatch`](AlertDispatcher::spawn_dispatch) runs the whole batch on
//! a tracked background task so callers are not held up by slow channels.

use std::sync::Arc;
use std::time::Duration;

use armis_core::alert::AlertEvent;
use futures::future::join_all;
use serde::Serialize;
use tokio_util::task::TaskTracker;

use crate::notifier::{NotifyError, Notifier};

/// Default per-notifier timeout.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of handing one alert to one notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Delivered,
    Failed(String),
    TimedOut,
    /// No notifier is configured; the alert was evaluated but not sent.
    Skipped,
}

/// One line of a dispatch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub subject: String,
    /// Notifier name, or `"none"` when nothing is configured.
    pub notifier: &'static str,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
}

/// Fans alerts out to notifiers. Cheap to clone.
#[derive(Clone)]
pub struct AlertDispatcher {
    notifiers: Arc<[Arc<dyn Notifier>]>,
    timeout: Duration,
    tracker: TaskTracker,
}

impl AlertDispatcher {
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>, timeout: Duration) -> Self {
        Self {
            notifiers: notifiers.into(),
            timeout,
            tracker: TaskTracker::new(),
        }
    }

    /// A dispatcher with no channels; every alert is logged and skipped.
    pub fn disabled() -> Self {
        Self::new(Vec::new(), DEFAULT_NOTIFY_TIMEOUT)
    }

    /// Whether at least one notifier is configured.
    pub fn is_enabled(&self) -> bool {
        !self.notifiers.is_empty()
    }

    /// Names of the configured notifiers.
    pub fn notifier_names(&self) -> Vec<&'static str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    /// Send one alert to every notifier concurrently.
    pub async fn dispatch(&self, alert: &AlertEvent) -> Vec<DispatchReport> {
        tracing::info!(
            kind = ?alert.kind,
            subject = %alert.subject,
            notifiers = self.notifiers.len(),
            "Dispatching alert"
        );

        if self.notifiers.is_empty() {
            tracing::warn!(
                subject = %alert.subject,
                "No notifier configured, alert not delivered"
            );
            return vec![DispatchReport {
                subject: alert.subject.clone(),
                notifier: "none",
                outcome: DispatchOutcome::Skipped,
            }];
        }

        let attempts = self
            .notifiers
            .iter()
            .map(|notifier| self.attempt(notifier.as_ref(), alert));
        join_all(attempts).await
    }

    /// Send a batch of alerts, one after another.
    pub async fn dispatch_all(&self, alerts: &[AlertEvent]) -> Vec<DispatchReport> {
        let mut reports = Vec::new();
        for alert in alerts {
            reports.extend(self.dispatch(alert).await);
        }
        reports
    }

    /// Dispatch on a background task and return immediately.
    ///
    /// Returns `false` if the dispatcher is shutting down and the batch was
    /// dropped.
    pub fn spawn_dispatch(&self, alerts: Vec<AlertEvent>) -> bool {
        if alerts.is_empty() {
            return true;
        }
        if self.tracker.is_closed() {
            tracing::warn!(
                count = alerts.len(),
                "Dispatcher is shutting down, dropping alerts"
            );
            return false;
        }

        let dispatcher = self.clone();
        self.tracker.spawn(async move {
            dispatcher.dispatch_all(&alerts).await;
        });
        true
    }

    /// Stop accepting background work and wait up to `grace` for in-flight
    /// dispatches. Returns `true` if everything finished in time.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            tracing::info!(pending, "Waiting for in-flight alert dispatches");
        }
        tokio::time::timeout(grace, self.tracker.wait()).await.is_ok()
    }

    async fn attempt(&self, notifier: &dyn Notifier, alert: &AlertEvent) -> DispatchReport {
        let result = match tokio::time::timeout(
            self.timeout,
            notifier.notify(&alert.subject, &alert.body),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(NotifyError::TimedOut {
                after_ms: self.timeout.as_millis(),
            }),
        };

        let outcome = match result {
            Ok(()) => {
                tracing::info!(notifier = notifier.name(), subject = %alert.subject, "Alert delivered");
                DispatchOutcome::Delivered
            }
            Err(NotifyError::TimedOut { after_ms }) => {
                tracing::warn!(
                    notifier = notifier.name(),
                    subject = %alert.subject,
                    after_ms,
                    "Alert delivery timed out"
                );
                DispatchOutcome::TimedOut
            }
            Err(e) => {
                tracing::warn!(
                    notifier = notifier.name(),
                    subject = %alert.subject,
                    error = %e,
                    "Alert delivery failed"
                );
                DispatchOutcome::Failed(e.to_string())
            }
        };

        DispatchReport {
            subject: alert.subject.clone(),
            notifier: notifier.name(),
            outcome,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

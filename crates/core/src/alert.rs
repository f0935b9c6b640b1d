//! Alert events emitted by the trigger evaluator.

use serde::Serialize;

/// What condition raised an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    HighTemperature,
    SoilDry,
    Rain,
    /// Raised by an operator, not by a reading.
    Manual,
}

/// A notification-worthy condition.
///
/// Events are fire-and-forget: they are not persisted, deduplicated or
/// rate-limited, so identical readings raise identical events every time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertEvent {
    pub kind: AlertKind,
    /// Short subject line.
    pub subject: String,
    /// Human-readable description.
    pub body: String,
}

impl AlertEvent {
    pub fn new(kind: AlertKind, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            body: body.into(),
        }
    }
}

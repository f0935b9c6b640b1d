//! Trigger evaluator: decides which alerts a reading raises.
//!
//! The predicates here are coarser than the risk policy (raw
//! keyword presence, no tiers). A reading can raise an alert while scoring
//! `Low`, and a `High` score can raise none; the two are independent.

use crate::alert::{AlertEvent, AlertKind};
use crate::reading::{ReadingPayload, SensorReading};

pub const SUBJECT_HIGH_TEMPERATURE: &str = "High Temperature Alert";
pub const SUBJECT_SOIL_DRY: &str = "Soil Dry Alert";
pub const SUBJECT_RAIN: &str = "Rain Alert";
pub const SUBJECT_MANUAL: &str = "Manual Risk Alert";

const MANUAL_BODY: &str = "A manual risk alert was raised from the monitoring dashboard.";

/// Trigger thresholds. Keywords are matched case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerThresholds {
    /// Alert when temperature is strictly above this value (Celsius).
    pub temperature_above: f64,
    /// Alert when the soil descriptor contains this keyword.
    pub soil_keyword: String,
    /// Alert when the rain descriptor contains this keyword...
    pub rain_keyword: String,
    /// ...unless it also contains this one (`"no rain"`, `"none"`).
    pub rain_negation: String,
}

impl Default for TriggerThresholds {
    fn default() -> Self {
        Self {
            temperature_above: 35.0,
            soil_keyword: "dry".to_string(),
            rain_keyword: "rain".to_string(),
            rain_negation: "no".to_string(),
        }
    }
}

/// Evaluate every predicate against `reading`. Predicates are independent,
/// so one reading can raise several alerts.
pub fn evaluate(reading: &SensorReading, thresholds: &TriggerThresholds) -> Vec<AlertEvent> {
    let mut alerts = Vec::new();

    let temperature = reading.temperature();
    if temperature > thresholds.temperature_above {
        alerts.push(AlertEvent::new(
            AlertKind::HighTemperature,
            SUBJECT_HIGH_TEMPERATURE,
            format!("Temperature reached {temperature} °C"),
        ));
    }

    let soil = reading.soil();
    if soil.contains(&thresholds.soil_keyword.to_lowercase()) {
        alerts.push(AlertEvent::new(
            AlertKind::SoilDry,
            SUBJECT_SOIL_DRY,
            format!("Soil condition: {soil}"),
        ));
    }

    let rain = reading.rain();
    if rain.contains(&thresholds.rain_keyword.to_lowercase())
        && !rain.contains(&thresholds.rain_negation.to_lowercase())
    {
        alerts.push(AlertEvent::new(
            AlertKind::Rain,
            SUBJECT_RAIN,
            format!("Rain status: {rain}"),
        ));
    }

    alerts
}

/// Evaluate an uploaded payload. Unstructured payloads raise nothing.
pub fn evaluate_payload(payload: &ReadingPayload, thresholds: &TriggerThresholds) -> Vec<AlertEvent> {
    match payload {
        ReadingPayload::Record(reading) => evaluate(reading, thresholds),
        ReadingPayload::Malformed(_) => {
            tracing::warn!("Trigger check skipped: payload is not a structured reading");
            Vec::new()
        }
    }
}

/// The operator-initiated alert. No predicate applies.
pub fn manual_alert() -> AlertEvent {
    AlertEvent::new(AlertKind::Manual, SUBJECT_MANUAL, MANUAL_BODY)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

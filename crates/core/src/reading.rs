//! Sensor readings and ingestion-time field normalization.
//!
//! A reading is a loose JSON object sent by the field device. Field names are
//! mapped onto the canonical names in [`crate::field_names`] through a
//! [`FieldAliases`] table; all other fields are kept verbatim so the raw
//! reading can be echoed back to dashboards.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::field_names::{FIELD_RAIN, FIELD_SOIL, FIELD_TEMPERATURE, FIELD_VIBRATION};

// ---------------------------------------------------------------------------
// FieldAliases
// ---------------------------------------------------------------------------

/// Built-in aliases seen from past producer firmware revisions.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("temp", FIELD_TEMPERATURE),
    ("rainfall", FIELD_RAIN),
    ("moisture", FIELD_SOIL),
];

/// Case-insensitive mapping from producer field names to canonical names.
///
/// Canonical names always resolve to themselves, so `Soil`, `SOIL` and
/// `soil` all land on [`FIELD_SOIL`].
#[derive(Debug, Clone)]
pub struct FieldAliases {
    /// Lowercased alias -> canonical name.
    map: HashMap<String, String>,
}

impl FieldAliases {
    /// An alias table that only knows the canonical names.
    pub fn canonical_only() -> Self {
        let map = [FIELD_TEMPERATURE, FIELD_SOIL, FIELD_RAIN, FIELD_VIBRATION]
            .iter()
            .map(|name| (name.to_string(), name.to_string()))
            .collect();
        Self { map }
    }

    /// Register `alias` as another spelling of `canonical`.
    pub fn insert(&mut self, alias: &str, canonical: &str) {
        self.map
            .insert(alias.trim().to_ascii_lowercase(), canonical.trim().to_string());
    }

    /// Merge overrides of the form `Alias=field,Other=field` on top of this table.
    ///
    /// Used for the `FIELD_ALIASES` environment variable.
    pub fn with_overrides(mut self, overrides: &str) -> Result<Self, CoreError> {
        for entry in overrides.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (alias, canonical) = entry.split_once('=').ok_or_else(|| {
                CoreError::Validation(format!(
                    "field alias '{entry}' must have the form Alias=field"
                ))
            })?;
            if alias.trim().is_empty() || canonical.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "field alias '{entry}' has an empty side"
                )));
            }
            self.insert(alias, canonical);
        }
        Ok(self)
    }

    /// Resolve a producer field name to its canonical name, if known.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.trim().to_ascii_lowercase())
            .map(String::as_str)
    }
}

impl Default for FieldAliases {
    fn default() -> Self {
        let mut aliases = Self::canonical_only();
        for (alias, canonical) in DEFAULT_ALIASES {
            aliases.insert(alias, canonical);
        }
        aliases
    }
}

// ---------------------------------------------------------------------------
// SensorReading
// ---------------------------------------------------------------------------

/// One batch of sensor values, keyed by canonical field name.
///
/// Every accessor is total: missing or unusable values read as the neutral
/// value (`0.0` or the empty descriptor) instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorReading {
    fields: Map<String, Value>,
}

impl SensorReading {
    /// An empty reading (every field absent).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a reading from raw producer fields, renaming them via `aliases`.
    ///
    /// When a payload carries both the canonical name and an alias of it, the
    /// canonical key wins.
    pub fn normalize(raw: Map<String, Value>, aliases: &FieldAliases) -> Self {
        let mut fields = Map::new();
        let mut exact: HashSet<String> = HashSet::new();

        for (key, value) in raw {
            match aliases.resolve(&key) {
                Some(canonical) if canonical == key => {
                    exact.insert(key.clone());
                    fields.insert(key, value);
                }
                Some(canonical) => {
                    if !exact.contains(canonical) {
                        fields.insert(canonical.to_string(), value);
                    }
                }
                None => {
                    fields.insert(key, value);
                }
            }
        }

        Self { fields }
    }

    /// Set a field by canonical name.
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// All fields, canonical and pass-through.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Numeric field value; JSON numbers and numeric strings are accepted.
    ///
    /// Anything else (absent, `null`, `"n/a"`, `NaN`) reads as `0.0`.
    pub fn numeric(&self, name: &str) -> f64 {
        let value = match self.fields.get(name) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        };
        value.filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    /// Lowercased descriptor for a free-text field.
    ///
    /// Non-string scalars are rendered as text; absent, `null` and structured
    /// values read as the empty descriptor.
    pub fn descriptor(&self, name: &str) -> String {
        match self.fields.get(name) {
            Some(Value::String(s)) => s.to_lowercase(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    pub fn temperature(&self) -> f64 {
        self.numeric(FIELD_TEMPERATURE)
    }

    pub fn soil(&self) -> String {
        self.descriptor(FIELD_SOIL)
    }

    pub fn rain(&self) -> String {
        self.descriptor(FIELD_RAIN)
    }

    pub fn vibration(&self) -> String {
        self.descriptor(FIELD_VIBRATION)
    }
}

// ---------------------------------------------------------------------------
// ReadingPayload
// ---------------------------------------------------------------------------

/// What the device actually sent.
///
/// A body that is valid JSON but not an object cannot be interpreted as a
/// reading. It is still accepted and stored so the dashboard can show it, and
/// the risk scorer reports it with the `Error` sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReadingPayload {
    /// A structured record (possibly empty).
    Record(SensorReading),
    /// Valid JSON that is not a record, kept verbatim.
    Malformed(Value),
}

impl ReadingPayload {
    /// Interpret a decoded JSON value. `null` is treated as an empty record.
    pub fn from_value(value: Value, aliases: &FieldAliases) -> Self {
        match value {
            Value::Object(raw) => Self::Record(SensorReading::normalize(raw, aliases)),
            Value::Null => Self::Record(SensorReading::new()),
            other => Self::Malformed(other),
        }
    }

    /// Decode an upload body.
    ///
    /// An empty (or whitespace-only) body is an empty record. Bytes that are
    /// not JSON at all are a validation error.
    pub fn from_body(body: &[u8], aliases: &FieldAliases) -> Result<Self, CoreError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::Record(SensorReading::new()));
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| CoreError::Validation(format!("reading is not valid JSON: {e}")))?;
        Ok(Self::from_value(value, aliases))
    }

    pub fn as_record(&self) -> Option<&SensorReading> {
        match self {
            Self::Record(reading) => Some(reading),
            Self::Malformed(_) => None,
        }
    }

    /// The payload as JSON, as it would be returned to a dashboard.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Record(reading) => Value::Object(reading.fields().clone()),
            Self::Malformed(raw) => raw.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

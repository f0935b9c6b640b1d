//! Canonical sensor field names.
//!
//! Producers in the field have used several spellings over time (`Temp`,
//! `Soil`, ...). Everything past the ingestion boundary works on these names
//! only; see [`crate::reading::FieldAliases`] for the mapping.

/// Air temperature in degrees Celsius (numeric).
pub const FIELD_TEMPERATURE: &str = "temperature";

/// Soil moisture descriptor, e.g. `"dry"`, `"wet"`.
pub const FIELD_SOIL: &str = "soil";

/// Precipitation descriptor, e.g. `"light rain"`, `"heavy"`, `"no rain"`.
pub const FIELD_RAIN: &str = "rain";

/// Ground vibration intensity descriptor, e.g. `"mild"`, `"strong"`.
pub const FIELD_VIBRATION: &str = "vibration";

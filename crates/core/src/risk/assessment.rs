//! Output types of the risk scorer.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::policy::RiskCategory;

/// Categorical risk level.
///
/// `NoData` and `Error` are sentinels: they are never produced from a
/// structured reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
    /// No reading has been received yet.
    #[serde(rename = "No Data")]
    NoData,
    /// The stored payload was not a structured reading.
    Error,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::NoData => "No Data",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The dominant contributor to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainFactor {
    Category(RiskCategory),
    /// Nothing contributed (score is zero).
    None,
    /// Used by the `No Data` and `Error` sentinels.
    NotApplicable,
}

impl MainFactor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category(category) => category.as_str(),
            Self::None => "None",
            Self::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for MainFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MainFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Weight contributed by one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FactorContribution {
    pub category: RiskCategory,
    pub weight: u32,
}

/// Scored and classified result for one reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    /// Sum of contributed weights, 0-100.
    pub risk_percent: u32,
    pub risk_level: RiskLevel,
    pub main_factor: MainFactor,
    /// Non-zero contributions in policy order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub factors: Vec<FactorContribution>,
}

impl RiskAssessment {
    /// Sentinel for "no reading has ever been received".
    pub fn no_data() -> Self {
        Self::sentinel(RiskLevel::NoData)
    }

    /// Sentinel for a payload that could not be interpreted as a reading.
    pub fn error() -> Self {
        Self::sentinel(RiskLevel::Error)
    }

    fn sentinel(risk_level: RiskLevel) -> Self {
        Self {
            risk_percent: 0,
            risk_level,
            main_factor: MainFactor::NotApplicable,
            factors: Vec::new(),
        }
    }
}
